use crate::config::{self, Config};
use crate::indiv::SubjectId;
use crate::io::{self, Source};
use crate::site::TARGET_SNPS;
use log::info;
use rayon::prelude::*;
use serde::Deserialize;
use snafu::prelude::*;
use std::backtrace::Backtrace;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot fetch {name} dataset"))]
    Fetch {
        name: String,
        #[snafu(backtrace)]
        source: io::Error,
    },
    #[snafu(display("{name} dataset is not valid JSON of the expected shape"))]
    Json {
        name: String,
        source: serde_json::Error,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(transparent)]
    Config {
        source: config::Error,
    },
}

type Result<T> = std::result::Result<T, Error>;

/// Self-reported eye colors: `{ "users": [ {user_id, variation}, ... ] }`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EyeColorSet {
    pub users: Vec<EyeColorRecord>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EyeColorRecord {
    pub user_id: SubjectId,
    pub variation: String,
}

/// One subject's observations for a single SNP
#[derive(Deserialize, Debug, Clone)]
pub struct GenotypeEntry {
    pub user: GenotypeUser,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GenotypeUser {
    pub id: SubjectId,
    #[serde(default)]
    pub genotypes: Vec<GenotypeObservation>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GenotypeObservation {
    pub local_genotype: String,
}

impl GenotypeEntry {
    /// Only the first observation counts
    pub fn first_genotype(&self) -> Option<&str> {
        self.user
            .genotypes
            .first()
            .map(|x| x.local_genotype.as_str())
    }
}

/// All genotype entries published for one SNP
#[derive(Debug, Clone)]
pub struct SnpGenotypeSet {
    pub snp: String,
    pub entries: Vec<GenotypeEntry>,
}

/// The four reference datasets, fully loaded.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub eye_colors: EyeColorSet,
    /// one set per target SNP, in canonical order
    pub snp_sets: Vec<SnpGenotypeSet>,
}

impl ReferenceData {
    pub fn snp_set(&self, snp: &str) -> Option<&SnpGenotypeSet> {
        self.snp_sets.iter().find(|x| x.snp == snp)
    }
}

pub fn parse_eye_colors(json: impl AsRef<[u8]>) -> Result<EyeColorSet> {
    serde_json::from_slice(json.as_ref()).context(JsonSnafu { name: "eye color" })
}

pub fn parse_genotype_set(snp: &str, json: impl AsRef<[u8]>) -> Result<SnpGenotypeSet> {
    let entries = serde_json::from_slice(json.as_ref()).context(JsonSnafu { name: snp })?;
    Ok(SnpGenotypeSet {
        snp: snp.to_owned(),
        entries,
    })
}

fn load_eye_colors(source: &impl Source, location: &str) -> Result<EyeColorSet> {
    info!("fetch eye color dataset from {location}");
    let bytes = source
        .fetch_bytes(location)
        .context(FetchSnafu { name: "eye color" })?;
    parse_eye_colors(bytes)
}

fn load_genotype_set(source: &impl Source, snp: &str, location: &str) -> Result<SnpGenotypeSet> {
    info!("fetch {snp} dataset from {location}");
    let bytes = source.fetch_bytes(location).context(FetchSnafu { name: snp })?;
    parse_genotype_set(snp, bytes)
}

/// Fetch and parse all four reference datasets.
///
/// The fetches run concurrently; the first failure fails the whole load, no
/// partial data is returned.
pub fn load_reference(source: &impl Source, cfg: &Config) -> Result<ReferenceData> {
    let locations = TARGET_SNPS
        .iter()
        .map(|snp| Ok((*snp, cfg.genotype_location(snp)?)))
        .collect::<Result<Vec<_>>>()?;

    let (eye_colors, snp_sets) = rayon::join(
        || load_eye_colors(source, &cfg.eye_color),
        || {
            locations
                .par_iter()
                .map(|(snp, loc)| load_genotype_set(source, snp, loc))
                .collect::<Result<Vec<_>>>()
        },
    );
    let data = ReferenceData {
        eye_colors: eye_colors?,
        snp_sets: snp_sets?,
    };
    info!(
        "loaded {} eye color records, {} genotype records",
        data.eye_colors.users.len(),
        data.snp_sets.iter().map(|x| x.entries.len()).sum::<usize>()
    );
    Ok(data)
}
