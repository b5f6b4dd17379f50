use crate::dataset::ReferenceData;
use crate::genotype::GenotypeTuple;
use crate::indiv::SubjectTable;
use crate::site::TARGET_SNPS;
use ahash::{HashMap, HashMapExt};
use itertools::Itertools;
use log::info;
use std::cmp::Reverse;

/// Eye colors reported by reference subjects, grouped by genotype tuple.
///
/// Each subject that has an eye color and a genotype for all three target SNPs
/// contributes exactly one label; everyone else contributes nothing.
#[derive(Debug, Clone, Default)]
pub struct GenotypeIndex {
    map: HashMap<GenotypeTuple, Vec<String>>,
    nsubjects: usize,
}

impl GenotypeIndex {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            nsubjects: 0,
        }
    }

    /// Join the eye color dataset with the three genotype datasets.
    ///
    /// Labels are lower-cased and otherwise kept verbatim. Subjects enter the
    /// index in eye color dataset order.
    pub fn build(data: &ReferenceData) -> Self {
        let colors: SubjectTable<String> = data
            .eye_colors
            .users
            .iter()
            .map(|r| (r.user_id.clone(), r.variation.to_lowercase()))
            .collect();

        let calls = TARGET_SNPS.map(|snp| {
            let mut t = SubjectTable::<String>::new();
            if let Some(set) = data.snp_set(snp) {
                for entry in &set.entries {
                    if let Some(gt) = entry.first_genotype() {
                        t.insert(entry.user.id.clone(), gt.to_owned());
                    }
                }
            }
            t
        });

        let mut index = Self::new();
        for (id, color) in colors.iter() {
            if let (Some(a), Some(b), Some(c)) =
                (calls[0].get(id), calls[1].get(id), calls[2].get(id))
            {
                let tuple = GenotypeTuple::new([a.clone(), b.clone(), c.clone()]);
                index.insert(tuple, color.clone());
            }
        }
        info!(
            "indexed {} of {} subjects into {} genotypes",
            index.nsubjects,
            colors.len(),
            index.map.len()
        );
        index
    }

    pub fn insert(&mut self, tuple: GenotypeTuple, color: String) {
        self.map.entry(tuple).or_default().push(color);
        self.nsubjects += 1;
    }

    /// Labels of the subjects sharing exactly `tuple`, in insertion order
    pub fn colors(&self, tuple: &GenotypeTuple) -> Option<&[String]> {
        self.map.get(tuple).map(|x| x.as_slice())
    }

    /// Number of subjects in the index
    pub fn nsubjects(&self) -> usize {
        self.nsubjects
    }

    pub fn ngenotypes(&self) -> usize {
        self.map.len()
    }

    /// Genotype tuples with their subject counts, largest first
    pub fn summary(&self) -> Vec<(&GenotypeTuple, usize)> {
        self.map
            .iter()
            .map(|(t, v)| (t, v.len()))
            .sorted_by_key(|(t, n)| (Reverse(*n), *t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::*;

    fn eye(pairs: &[(&str, &str)]) -> EyeColorSet {
        let s = serde_json::json!({
            "users": pairs.iter().map(|(id, c)| serde_json::json!({"user_id": id, "variation": c})).collect::<Vec<_>>()
        });
        serde_json::from_value(s).unwrap()
    }

    fn snp_set(snp: &str, pairs: &[(&str, Option<&str>)]) -> SnpGenotypeSet {
        let v: Vec<_> = pairs
            .iter()
            .map(|(id, gt)| {
                let gts: Vec<_> = gt
                    .iter()
                    .map(|g| serde_json::json!({"local_genotype": g}))
                    .collect();
                serde_json::json!({"user": {"id": id, "genotypes": gts}})
            })
            .collect();
        SnpGenotypeSet {
            snp: snp.to_owned(),
            entries: serde_json::from_value(serde_json::Value::Array(v)).unwrap(),
        }
    }

    fn tuple(a: &str, b: &str, c: &str) -> GenotypeTuple {
        GenotypeTuple::new([a.into(), b.into(), c.into()])
    }

    #[test]
    fn test_single_subject() {
        let data = ReferenceData {
            eye_colors: eye(&[("42", "Brown")]),
            snp_sets: vec![
                snp_set("rs12203592", &[("42", Some("CC"))]),
                snp_set("rs12913832", &[("42", Some("AG"))]),
                snp_set("rs16891982", &[("42", Some("GG"))]),
            ],
        };
        let index = GenotypeIndex::build(&data);
        assert_eq!(index.nsubjects(), 1);
        assert_eq!(
            index.colors(&tuple("CC", "AG", "GG")),
            Some(&["brown".to_owned()][..])
        );
        assert_eq!(index.colors(&tuple("CC", "GA", "GG")), None);
    }

    #[test]
    fn test_subject_needs_all_four_sources() {
        let data = ReferenceData {
            eye_colors: eye(&[("1", "Blue"), ("2", "Green"), ("3", "Hazel"), ("5", "Grey")]),
            snp_sets: vec![
                // 1 is complete; 2 has an empty observation list; 3 lacks rs16891982;
                // 4 has no eye color; 5 is complete
                snp_set(
                    "rs12203592",
                    &[("1", Some("CC")), ("2", Some("CC")), ("3", Some("CC")), ("4", Some("CC")), ("5", Some("CT"))],
                ),
                snp_set(
                    "rs12913832",
                    &[("1", Some("GG")), ("2", None), ("3", Some("GG")), ("4", Some("GG")), ("5", Some("AG"))],
                ),
                snp_set(
                    "rs16891982",
                    &[("1", Some("GG")), ("2", Some("GG")), ("4", Some("GG")), ("5", Some("GG"))],
                ),
            ],
        };
        let index = GenotypeIndex::build(&data);
        assert_eq!(index.nsubjects(), 2);
        assert_eq!(index.ngenotypes(), 2);
        assert_eq!(
            index.colors(&tuple("CC", "GG", "GG")),
            Some(&["blue".to_owned()][..])
        );
        assert_eq!(
            index.colors(&tuple("CT", "AG", "GG")),
            Some(&["grey".to_owned()][..])
        );
    }

    #[test]
    fn test_missing_snp_dataset_yields_empty_index() {
        let data = ReferenceData {
            eye_colors: eye(&[("1", "Blue")]),
            snp_sets: vec![
                snp_set("rs12203592", &[("1", Some("CC"))]),
                snp_set("rs12913832", &[("1", Some("GG"))]),
            ],
        };
        let index = GenotypeIndex::build(&data);
        assert_eq!(index.nsubjects(), 0);
        assert!(index.summary().is_empty());
    }

    #[test]
    fn test_labels_lowercased_not_cleaned() {
        let data = ReferenceData {
            eye_colors: eye(&[("1", "Blue-Grey "), ("2", "rs12913832 GG")]),
            snp_sets: vec![
                snp_set("rs12203592", &[("1", Some("CC")), ("2", Some("CC"))]),
                snp_set("rs12913832", &[("1", Some("GG")), ("2", Some("GG"))]),
                snp_set("rs16891982", &[("1", Some("GG")), ("2", Some("GG"))]),
            ],
        };
        let index = GenotypeIndex::build(&data);
        assert_eq!(
            index.colors(&tuple("CC", "GG", "GG")).unwrap(),
            &["blue-grey ".to_owned(), "rs12913832 gg".to_owned()][..]
        );
    }

    #[test]
    fn test_summary_order() {
        let mut index = GenotypeIndex::new();
        index.insert(tuple("CC", "GG", "GG"), "blue".into());
        index.insert(tuple("CC", "AG", "GG"), "brown".into());
        index.insert(tuple("CC", "AG", "GG"), "hazel".into());
        index.insert(tuple("CC", "AA", "GG"), "brown".into());
        let s = index.summary();
        assert_eq!(
            s,
            vec![
                (&tuple("CC", "AG", "GG"), 2),
                (&tuple("CC", "AA", "GG"), 1),
                (&tuple("CC", "GG", "GG"), 1),
            ]
        );
    }
}
