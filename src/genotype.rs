use crate::site::{TARGET_SNPS, UNKNOWN};
use serde::Serialize;
use std::fmt;

/// Genotypes at the three target SNPs, in `TARGET_SNPS` order.
///
/// Equality is exact string equality: `AG` and `GA` are different genotypes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GenotypeTuple([String; 3]);

impl GenotypeTuple {
    pub fn new(calls: [String; 3]) -> Self {
        Self(calls)
    }

    /// A tuple where every position holds the `UNKNOWN` sentinel
    pub fn unknown() -> Self {
        Self([UNKNOWN.to_owned(), UNKNOWN.to_owned(), UNKNOWN.to_owned()])
    }

    pub fn get(&self, idx: usize) -> &str {
        &self.0[idx]
    }

    pub fn set(&mut self, idx: usize, call: &str) {
        self.0[idx] = call.to_owned();
    }

    pub fn calls(&self) -> &[String; 3] {
        &self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|x| x != UNKNOWN)
    }

    /// Iterate `(snp, genotype)` pairs in canonical order
    pub fn iter_snps(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        TARGET_SNPS.iter().copied().zip(self.0.iter().map(|x| x.as_str()))
    }
}

impl fmt::Display for GenotypeTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(a: &str, b: &str, c: &str) -> GenotypeTuple {
        GenotypeTuple::new([a.into(), b.into(), c.into()])
    }

    #[test]
    fn test_allele_order_is_significant() {
        assert_ne!(tuple("CC", "AG", "GG"), tuple("CC", "GA", "GG"));
        assert_eq!(tuple("CC", "AG", "GG"), tuple("CC", "AG", "GG"));
    }

    #[test]
    fn test_unknown_and_complete() {
        let mut t = GenotypeTuple::unknown();
        assert!(!t.is_complete());
        t.set(0, "CC");
        t.set(1, "AG");
        assert!(!t.is_complete());
        assert_eq!(t.get(2), UNKNOWN);
        t.set(2, "GG");
        assert!(t.is_complete());
        assert_eq!(t.to_string(), "(CC, AG, GG)");
    }

    #[test]
    fn test_iter_snps_in_canonical_order() {
        let t = tuple("CC", "AG", "GG");
        let v: Vec<_> = t.iter_snps().collect();
        assert_eq!(
            v,
            vec![("rs12203592", "CC"), ("rs12913832", "AG"), ("rs16891982", "GG")]
        );
    }
}
