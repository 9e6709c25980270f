use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod enrichment;
pub mod headers;
pub mod ranks;

use crate::model::entry::LeaderboardEntry;
use crate::model::profile::ScoringProfile;
use headers::benchmark_headers;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Scrape batch as handed over by the browser adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub headers: Vec<String>,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone)]
pub struct InputBundle {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub benchmark_headers: Vec<String>,
    pub entries: Vec<LeaderboardEntry>,
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let reader = open_maybe_gz(path)?;
    serde_json::from_reader(reader).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_batch(path: &Path, profile: &ScoringProfile) -> Result<InputBundle, InputError> {
    let batch: BatchFile = read_json(path)?;
    Ok(bundle_from_batch(path, batch, profile))
}

pub fn bundle_from_batch(path: &Path, batch: BatchFile, profile: &ScoringProfile) -> InputBundle {
    if batch.entries.is_empty() {
        tracing::warn!(path = %path.display(), "scrape batch contains no entries");
    }

    let headers = if batch.headers.is_empty() {
        headers_from_fields(&batch.entries)
    } else {
        batch.headers
    };
    let benchmark_headers = benchmark_headers(&headers, profile);

    tracing::info!(
        path = %path.display(),
        entries = batch.entries.len(),
        headers = headers.len(),
        benchmarks = benchmark_headers.len(),
        "loaded scrape batch"
    );

    InputBundle {
        path: path.to_path_buf(),
        headers,
        benchmark_headers,
        entries: batch.entries,
    }
}

/// Union of field names across entries, in first-seen order.
fn headers_from_fields(entries: &[LeaderboardEntry]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        for key in entry.fields.keys() {
            if !out.contains(key) {
                out.push(key.clone());
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
