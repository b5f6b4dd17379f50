use log::debug;
use snafu::prelude::*;
use std::backtrace::Backtrace;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot build http client"))]
    BuildClient {
        source: reqwest::Error,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(display("request to {url} failed"))]
    Http {
        url: String,
        source: reqwest::Error,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(display("{url} answered with status {status}"))]
    HttpStatus {
        url: String,
        status: u16,
        backtrace: Box<Option<Backtrace>>,
    },
    #[snafu(display("cannot read {path}"))]
    ReadFile {
        path: String,
        source: std::io::Error,
        backtrace: Box<Option<Backtrace>>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Something that can hand back the raw bytes behind a location.
///
/// Locations are URLs or file paths; implementations decide how to resolve
/// them. Fetches are single-shot: no retry on failure. Bytes are returned
/// undecoded so that a stray non-UTF-8 byte only affects the row it sits in.
pub trait Source: Sync {
    fn fetch_bytes(&self, location: &str) -> Result<Vec<u8>>;
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Resolves URLs over HTTP(S) and everything else as a local file path.
pub struct Fetcher {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context(BuildClientSnafu)?;
        Ok(Self {
            client,
            token: None,
        })
    }

    /// Send `token` as a bearer credential with every HTTP request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().context(HttpSnafu { url })?;
        let status = resp.status();
        ensure!(
            status.is_success(),
            HttpStatusSnafu {
                url,
                status: status.as_u16()
            }
        );
        let body = resp.bytes().context(HttpSnafu { url })?;
        Ok(body.to_vec())
    }
}

impl Source for Fetcher {
    fn fetch_bytes(&self, location: &str) -> Result<Vec<u8>> {
        if is_remote(location) {
            debug!("GET {location}");
            self.fetch_remote(location)
        } else {
            debug!("read {location}");
            read_file(location)
        }
    }
}

pub fn read_file(p: impl AsRef<Path>) -> Result<Vec<u8>> {
    std::fs::read(p.as_ref()).context(ReadFileSnafu {
        path: p.as_ref().to_string_lossy(),
    })
}

/// In-memory source keyed by location, for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemorySource {
    pub docs: ahash::HashMap<String, Vec<u8>>,
}

#[cfg(test)]
impl MemorySource {
    pub fn with(self, location: &str, text: &str) -> Self {
        self.with_bytes(location, text.as_bytes())
    }

    pub fn with_bytes(mut self, location: &str, bytes: &[u8]) -> Self {
        self.docs.insert(location.to_owned(), bytes.to_vec());
        self
    }
}

#[cfg(test)]
impl Source for MemorySource {
    fn fetch_bytes(&self, location: &str) -> Result<Vec<u8>> {
        match self.docs.get(location) {
            Some(s) => Ok(s.clone()),
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound))
                .context(ReadFileSnafu { path: location }),
        }
    }
}

#[test]
fn test_is_remote() {
    assert!(is_remote("https://example.org/x.json"));
    assert!(is_remote("http://example.org/x.json"));
    assert!(!is_remote("testdata/x.json"));
    assert!(!is_remote("/tmp/https.json"));
}

#[test]
fn test_fetcher_reads_local_files() {
    let f = Fetcher::new(Duration::from_secs(1)).unwrap();
    let b = f.fetch_bytes("testdata/genome_sample_v5.txt").unwrap();
    assert_eq!(b.first(), Some(&b'#'));
    // non-UTF-8 content is returned as is
    let b = f.fetch_bytes("testdata/latin1_export_v5.txt").unwrap();
    assert!(std::str::from_utf8(&b).is_err());
    assert!(matches!(
        f.fetch_bytes("testdata/does_not_exist.txt"),
        Err(Error::ReadFile { .. })
    ));
}
