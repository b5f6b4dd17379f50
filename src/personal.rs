//! Personal genotype file: discovery and extraction of the target SNPs.
//!
//! The file is tab-delimited, one record per line:
//!     - SNP identifier
//!     - chromosome
//!     - position
//!     - genotype (allele pair, kept exactly as written)
//! preceded by a block of comment lines. The bytes are not required to be
//! UTF-8 as a whole: comment lines are never decoded, and a data row that is
//! not valid UTF-8 is skipped on its own.

use crate::genotype::GenotypeTuple;
use crate::io::{self, Source};
use crate::site::target_index;
use log::{info, warn};
use snafu::prelude::*;
use std::backtrace::Backtrace;
use std::path::{Path, PathBuf};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot retrieve personal genotype file"))]
    Retrieval {
        #[snafu(backtrace)]
        source: io::Error,
    },
    #[snafu(display("cannot parse personal genotype file"))]
    Parse {
        source: csv::Error,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(display("cannot list directory {dir}"))]
    ListDir {
        dir: String,
        source: std::io::Error,
        backtrace: Box<Option<Backtrace>>,
    },
}

type Result<T> = std::result::Result<T, Error>;

/// Read the target genotypes from tab-delimited text.
///
/// Lines starting with `comment` are skipped. When a target SNP shows up more
/// than once, the last occurrence wins. Targets that never show up stay
/// `UNKNOWN`.
pub fn extract_genotypes(data: impl AsRef<[u8]>, comment: u8) -> Result<GenotypeTuple> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(comment))
        .flexible(true)
        .quoting(false)
        .from_reader(data.as_ref());

    let mut tuple = GenotypeTuple::unknown();
    let mut record = csv::StringRecord::new();
    let mut row = 0usize;
    loop {
        row += 1;
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            // a row that is not valid text is skipped; anything else aborts
            Err(e) if !e.is_io_error() => {
                warn!("skip unreadable row {row}: {e}");
                continue;
            }
            Err(e) => return Err(e).context(ParseSnafu),
        }
        if record.len() < 4 {
            warn!("skip row {row} with {} fields", record.len());
            continue;
        }
        if let Some(idx) = target_index(&record[0]) {
            tuple.set(idx, &record[3]);
        }
    }
    Ok(tuple)
}

/// Fetch the personal file from `location` and extract the target genotypes
pub fn load_genotypes(source: &impl Source, location: &str, comment: u8) -> Result<GenotypeTuple> {
    info!("read personal genotypes from {location}");
    let bytes = source.fetch_bytes(location).context(RetrievalSnafu)?;
    let tuple = extract_genotypes(bytes, comment)?;
    if !tuple.is_complete() {
        warn!("some target SNPs are missing from {location}: {tuple}");
    }
    Ok(tuple)
}

/// Find a raw genotype export in `dir`.
///
/// Raw exports are named like `genome_<name>_<version>.txt`; the first match
/// in name order is returned. A directory that does not exist holds no export.
pub fn find_genome_file(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("search directory {} does not exist", dir.display());
            return Ok(None);
        }
        r => r.context(ListDirSnafu {
            dir: dir.to_string_lossy(),
        })?,
    };
    let mut found = vec![];
    for entry in entries {
        let entry = entry.context(ListDirSnafu {
            dir: dir.to_string_lossy(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let qualifies = path
            .file_name()
            .and_then(|x| x.to_str())
            .map(|name| name.starts_with("genome") && name.ends_with(".txt"))
            .unwrap_or(false);
        if qualifies {
            found.push(path);
        }
    }
    found.sort();
    Ok(found.into_iter().next())
}
