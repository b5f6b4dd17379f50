use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque identifier of a reference subject.
///
/// The public datasets encode ids as JSON numbers in some files and strings in
/// others, so both are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(i) => Self(i.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// Subject-keyed table that remembers first-seen order.
///
/// Inserting an id that is already present replaces its value but keeps its
/// original position.
#[derive(Debug, Clone)]
pub struct SubjectTable<V> {
    vec: Vec<SubjectId>,
    map: HashMap<SubjectId, V>,
}

impl<V> Default for SubjectTable<V> {
    fn default() -> Self {
        Self {
            vec: Vec::new(),
            map: HashMap::new(),
        }
    }
}

impl<V> SubjectTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SubjectId, value: V) {
        if !self.map.contains_key(&id) {
            self.vec.push(id.clone());
        }
        self.map.insert(id, value);
    }

    pub fn get(&self, id: &SubjectId) -> Option<&V> {
        self.map.get(id)
    }

    pub fn contains(&self, id: &SubjectId) -> bool {
        self.map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Iterate entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&SubjectId, &V)> + '_ {
        self.vec.iter().filter_map(|id| self.map.get(id).map(|v| (id, v)))
    }
}

impl<V> FromIterator<(SubjectId, V)> for SubjectTable<V> {
    fn from_iter<I: IntoIterator<Item = (SubjectId, V)>>(iter: I) -> Self {
        let mut t = Self::new();
        for (id, v) in iter {
            t.insert(id, v);
        }
        t
    }
}

#[test]
fn test_subject_id_from_number_or_string() {
    let ids: Vec<SubjectId> = serde_json::from_str(r#"[42, "42", "abc"]"#).unwrap();
    assert_eq!(ids[0], SubjectId::new("42"));
    assert_eq!(ids[0], ids[1]);
    assert_eq!(ids[2].as_str(), "abc");
}

#[test]
fn test_subject_table_last_value_first_position() {
    let t: SubjectTable<&str> = [
        (SubjectId::new("1"), "blue"),
        (SubjectId::new("2"), "green"),
        (SubjectId::new("1"), "brown"),
    ]
    .into_iter()
    .collect();
    assert_eq!(t.len(), 2);
    let v: Vec<_> = t.iter().map(|(id, c)| (id.as_str(), *c)).collect();
    assert_eq!(v, vec![("1", "brown"), ("2", "green")]);
    assert!(t.contains(&SubjectId::new("2")));
    assert!(t.get(&SubjectId::new("3")).is_none());
}
