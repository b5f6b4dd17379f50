/// Target SNPs in canonical order.
///
/// Genotype tuples are always laid out in this order, regardless of the order
/// in which the SNPs appear in any input file.
pub const TARGET_SNPS: [&str; 3] = ["rs12203592", "rs12913832", "rs16891982"];

/// Genotype value used when a target SNP is absent from a personal file.
pub const UNKNOWN: &str = "unknown";

/// Position of a SNP within a genotype tuple, if it is one of the targets.
pub fn target_index(snp: &str) -> Option<usize> {
    TARGET_SNPS.iter().position(|x| *x == snp)
}

#[test]
fn test_target_index() {
    assert_eq!(target_index("rs12203592"), Some(0));
    assert_eq!(target_index("rs12913832"), Some(1));
    assert_eq!(target_index("rs16891982"), Some(2));
    assert_eq!(target_index("rs0"), None);
    // lookups are exact
    assert_eq!(target_index("RS12203592"), None);
}
