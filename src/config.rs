use crate::site::TARGET_SNPS;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::backtrace::Backtrace;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot read config file {path}"))]
    Io {
        path: String,
        source: std::io::Error,
        backtrace: Box<Option<Backtrace>>,
    },
    TomlDe {
        source: Box<toml::de::Error>,
        backtrace: Box<Option<Backtrace>>,
    },
    TomlSer {
        source: Box<toml::ser::Error>,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(display("no genotype dataset configured for {snp}"))]
    MissingGenotypeDataset {
        snp: String,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(display("comment marker {marker:?} is not a single ASCII character"))]
    InvalidCommentMarker {
        marker: char,
        backtrace: Box<Option<Backtrace>>,
    },
}

type Result<T> = std::result::Result<T, Error>;

pub const DEFAULT_EYE_COLOR: &str = "https://opensnp.org/phenotypes/json/variations/1.json";
pub const DEFAULT_TOKEN_ENV: &str = "GENOME_ACCESS_TOKEN";

/// Where the reference datasets live and how to reach them.
///
/// Locations are either URLs or paths to pre-fetched copies.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub timeout_secs: u64,
    pub token_env: String,
    pub comment_marker: char,
    pub eye_color: String,
    pub genotypes: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let genotypes = TARGET_SNPS
            .iter()
            .map(|snp| {
                (
                    snp.to_string(),
                    format!("https://opensnp.org/snps/json/{snp}/all.json"),
                )
            })
            .collect();
        Self {
            timeout_secs: 30,
            token_env: DEFAULT_TOKEN_ENV.to_owned(),
            comment_marker: '#',
            eye_color: DEFAULT_EYE_COLOR.to_owned(),
            genotypes,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).map_err(Box::new).context(TomlDeSnafu)?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn from_toml_file(p: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(p.as_ref()).context(IoSnafu {
            path: p.as_ref().to_string_lossy(),
        })?;
        Self::from_toml_str(&s)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(Box::new).context(TomlSerSnafu)
    }

    fn check(&self) -> Result<()> {
        for snp in TARGET_SNPS {
            ensure!(
                self.genotypes.contains_key(snp),
                MissingGenotypeDatasetSnafu { snp }
            );
        }
        ensure!(
            self.comment_marker.is_ascii(),
            InvalidCommentMarkerSnafu {
                marker: self.comment_marker
            }
        );
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Comment marker as the byte the tab-delimited reader expects
    pub fn comment_byte(&self) -> u8 {
        // check() guarantees ASCII; fall back to '#' for configs built in code
        u8::try_from(self.comment_marker).unwrap_or(b'#')
    }

    /// Location of the genotype dataset for `snp`
    pub fn genotype_location(&self, snp: &str) -> Result<&str> {
        self.genotypes
            .get(snp)
            .map(|x| x.as_str())
            .context(MissingGenotypeDatasetSnafu { snp })
    }

    /// Access token for the personal-data download, read from `token_env`
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|x| !x.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let cfg = Config::default();
        let s = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&s).unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = Config::from_toml_str("timeout_secs = 5\n").unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.eye_color, DEFAULT_EYE_COLOR);
        assert_eq!(cfg.comment_byte(), b'#');
        assert_eq!(cfg.genotypes.len(), 3);
    }

    #[test]
    fn test_all_three_genotype_datasets_required() {
        let s = r#"
[genotypes]
rs12203592 = "a.json"
rs12913832 = "b.json"
"#;
        assert!(matches!(
            Config::from_toml_str(s),
            Err(Error::MissingGenotypeDataset { snp, .. }) if snp == "rs16891982"
        ));
    }

    #[test]
    fn test_non_ascii_comment_marker_rejected() {
        assert!(matches!(
            Config::from_toml_str("comment_marker = \"é\"\n"),
            Err(Error::InvalidCommentMarker { .. })
        ));
        let cfg = Config::from_toml_str("comment_marker = \"%\"\n").unwrap();
        assert_eq!(cfg.comment_byte(), b'%');
    }
}
