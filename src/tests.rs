use crate::config::Config;
use crate::genotype::GenotypeTuple;
use crate::index::GenotypeIndex;
use crate::io::{Fetcher, MemorySource};
use crate::pipeline;
use crate::report::ColorDistribution;
use crate::site::UNKNOWN;
use std::time::Duration;

fn tuple(a: &str, b: &str, c: &str) -> GenotypeTuple {
    GenotypeTuple::new([a.into(), b.into(), c.into()])
}

fn fixtures() -> (Fetcher, Config) {
    let cfg = Config::from_toml_file("testdata/config.toml").unwrap();
    let f = Fetcher::new(Duration::from_secs(5)).unwrap();
    (f, cfg)
}

#[test]
fn pipeline_on_fixture_files() {
    let (f, cfg) = fixtures();
    let rpt = pipeline::run(&f, "testdata/genome_sample_v5.txt", &f, &cfg).unwrap();

    assert_eq!(rpt.personal, tuple("CC", "AG", "GG"));
    // subject 11 shares the genotype but reported no eye color
    let d = &rpt.distribution;
    assert_eq!(d.total, 1);
    assert_eq!(d.shares.len(), 1);
    assert_eq!(d.shares[0].label, "brown");
    assert_eq!(d.shares[0].share, 1.0);
    // 42, 7, 8 and 9 have all four datasets
    assert_eq!(d.reference_total, 4);
}

#[test]
fn index_on_fixture_files() {
    let (f, cfg) = fixtures();
    let index = pipeline::build_index(&f, &cfg).unwrap();
    assert_eq!(index.nsubjects(), 4);

    // the second observation of subject 8 is ignored
    let d = ColorDistribution::from_index(&index, &tuple("CC", "GG", "GG"));
    assert_eq!(d.total, 2);
    assert_eq!(d.shares[0].label, "blue");
    assert_eq!(d.shares[0].count, 2);

    assert_eq!(index.colors(&tuple("CC", "AA", "GG")), None);
    // hazel (10) lacks rs16891982; 12 has no rs12913832 observation
    let all: Vec<_> = index
        .summary()
        .into_iter()
        .flat_map(|(t, _)| index.colors(t).unwrap_or_default().to_vec())
        .collect();
    assert!(!all.iter().any(|x| x == "hazel"));
    assert_eq!(all.iter().filter(|x| *x == "brown").count(), 1);
}

#[test]
fn pipeline_missing_snp_matches_nobody() {
    let (f, cfg) = fixtures();
    let rpt = pipeline::run(&f, "testdata/personal_missing_rs16891982.txt", &f, &cfg).unwrap();
    assert_eq!(rpt.personal.get(0), "CC");
    assert_eq!(rpt.personal.get(1), "AG");
    assert_eq!(rpt.personal.get(2), UNKNOWN);
    assert!(rpt.distribution.is_empty());
    assert_eq!(rpt.distribution.total, 0);
}

#[test]
fn pipeline_on_latin1_export() {
    let (f, cfg) = fixtures();
    let rpt = pipeline::run(&f, "testdata/latin1_export_v5.txt", &f, &cfg).unwrap();
    assert_eq!(rpt.personal, tuple("CC", "AG", "GG"));
    assert_eq!(rpt.distribution.total, 1);
    assert_eq!(rpt.distribution.shares[0].label, "brown");
}

#[test]
fn pipeline_with_in_memory_sources() {
    let mut cfg = Config::default();
    cfg.eye_color = "eye".into();
    cfg.genotypes.insert("rs12203592".into(), "a".into());
    cfg.genotypes.insert("rs12913832".into(), "b".into());
    cfg.genotypes.insert("rs16891982".into(), "c".into());

    let reference = MemorySource::default()
        .with("eye", r#"{"users": [{"user_id": 42, "variation": "Brown"}]}"#)
        .with("a", r#"[{"user": {"id": 42, "genotypes": [{"local_genotype": "CC"}]}}]"#)
        .with("b", r#"[{"user": {"id": 42, "genotypes": [{"local_genotype": "AG"}]}}]"#)
        .with("c", r#"[{"user": {"id": 42, "genotypes": [{"local_genotype": "GG"}]}}]"#);
    let personal = MemorySource::default().with(
        "me",
        "#comment\nrs12913832\t15\t1234\tAG\nrs16891982\t5\t5678\tGG\nrs12203592\t6\t9012\tCC\n",
    );
    let rpt = pipeline::run(&personal, "me", &reference, &cfg).unwrap();
    assert_eq!(rpt.personal, tuple("CC", "AG", "GG"));
    assert_eq!(rpt.distribution.total, 1);
    assert_eq!(rpt.distribution.shares[0].label, "brown");

    // the personal file never reaches the reference source and vice versa
    assert!(pipeline::run(&reference, "me", &reference, &cfg).is_err());
    assert!(pipeline::run(&personal, "me", &personal, &cfg).is_err());
}

#[test]
fn unmatched_genotype_is_not_an_error() {
    let index = GenotypeIndex::new();
    let d = ColorDistribution::from_index(&index, &tuple("TT", "AA", "CC"));
    assert!(d.shares.is_empty());
    assert_eq!(d.total, 0);
}
