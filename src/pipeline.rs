use crate::config::Config;
use crate::dataset::{self, ReferenceData};
use crate::genotype::GenotypeTuple;
use crate::index::GenotypeIndex;
use crate::io::Source;
use crate::personal;
use crate::report::ColorDistribution;
use snafu::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(transparent)]
    Personal {
        source: personal::Error,
    },
    #[snafu(transparent)]
    Dataset {
        source: dataset::Error,
    },
}

type Result<T> = std::result::Result<T, Error>;

/// Result of one run: the caller's genotypes and the matching eye colors
#[derive(Debug, Clone)]
pub struct Report {
    pub personal: GenotypeTuple,
    pub distribution: ColorDistribution,
}

/// Fetch and index the reference datasets
pub fn build_index(reference: &impl Source, cfg: &Config) -> Result<GenotypeIndex> {
    let data: ReferenceData = dataset::load_reference(reference, cfg)?;
    Ok(GenotypeIndex::build(&data))
}

/// Extract the personal genotypes, build the index, report the distribution.
///
/// `personal_source` and `reference` are separate so that the personal
/// download can carry an access token the public datasets never see.
pub fn run(
    personal_source: &impl Source,
    personal_location: &str,
    reference: &impl Source,
    cfg: &Config,
) -> Result<Report> {
    let personal =
        personal::load_genotypes(personal_source, personal_location, cfg.comment_byte())?;
    let index = build_index(reference, cfg)?;
    let distribution = ColorDistribution::from_index(&index, &personal);
    Ok(Report {
        personal,
        distribution,
    })
}
