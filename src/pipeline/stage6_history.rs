use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::entry::Cohort;
use crate::model::history::{HistoryDocument, HistoryRecord, HistoryRow, ROW_FIXED_KEYS};
use crate::pipeline::stage4_scores::ScoredEntry;
use crate::report::round2;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history document {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history document {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to back up {} to {}: {source}", .path.display(), .backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write history document {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize history document: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    pub backup: Option<PathBuf>,
    pub history_len: usize,
}

/// ISO-8601 local time with an explicit offset, e.g. `2026-10-19T14:03:11+02:00`.
pub fn current_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

pub fn history_row(scored: &ScoredEntry, headers: &[String]) -> HistoryRow {
    let entry = &scored.entry;
    let score = &scored.score;

    let mut columns = Map::new();
    let extra = entry.fields.keys().filter(|k| !headers.contains(k));
    for header in headers.iter().chain(extra) {
        let Some(value) = entry.fields.get(header) else {
            continue;
        };
        let key = header.replace(' ', "");
        if key.is_empty() || ROW_FIXED_KEYS.contains(&key.as_str()) || columns.contains_key(&key)
        {
            continue;
        }
        columns.insert(key, Value::String(value.clone()));
    }

    HistoryRow {
        model: entry.name.clone(),
        company: entry.company.clone(),
        link: entry.source_url.clone(),
        origin: entry.cohort,
        description: entry.description.clone(),
        created: entry.created_date.clone(),
        total: round2(score.raw_weighted_total),
        avg_iq: round2(score.capability),
        value: round2(score.cost_efficiency),
        unified: round2(score.unified),
        columns,
    }
}

/// Every known cohort gets a key, even when it has no rows this run.
pub fn build_history_record(
    scored: &[ScoredEntry],
    headers: &[String],
    timestamp: String,
) -> HistoryRecord {
    let mut cohorts: BTreeMap<Cohort, Vec<HistoryRow>> =
        Cohort::ALL.iter().map(|&c| (c, Vec::new())).collect();
    for s in scored {
        cohorts
            .entry(s.entry.cohort)
            .or_default()
            .push(history_row(s, headers));
    }
    HistoryRecord { timestamp, cohorts }
}

/// `models.json` -> `models.backup-2026-10-19T120501.json`
pub fn backup_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let stamp = at.format("%Y-%m-%dT%H%M%S");
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "history".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{stem}.backup-{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}.backup-{stamp}"),
    };
    path.with_file_name(name)
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, HistoryError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(HistoryError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_document(path: &Path, bytes: &[u8]) -> Result<HistoryDocument, HistoryError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(HistoryDocument::default());
    }
    serde_json::from_slice(bytes).map_err(|source| HistoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_history(path: &Path) -> Result<HistoryDocument, HistoryError> {
    let bytes = fs::read(path).map_err(|source| HistoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &bytes)
}

/// Newest record of the document, or `None` when the history is empty.
pub fn load_latest_record(path: &Path) -> Result<Option<HistoryRecord>, HistoryError> {
    let doc = read_history(path)?;
    let Some(latest) = doc.latest() else {
        return Ok(None);
    };
    let record = serde_json::from_value(latest.clone()).map_err(|source| HistoryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(record))
}

fn write_backup(path: &Path, bytes: &[u8], at: DateTime<Utc>) -> Result<PathBuf, HistoryError> {
    let backup = backup_path(path, at);
    let result = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&backup)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        });
    match result {
        Ok(()) => Ok(backup),
        Err(source) => Err(HistoryError::Backup {
            path: path.to_path_buf(),
            backup,
            source,
        }),
    }
}

fn write_document(path: &Path, payload: &[u8]) -> Result<(), HistoryError> {
    let wrap = |source| HistoryError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(wrap)?);
    w.write_all(payload).map_err(wrap)?;
    w.flush().map_err(wrap)
}

/// Prepends `record` to the document at `path`.
///
/// The existing file is read and the new document fully serialized before
/// anything is written. A byte-for-byte backup of the previous file is then
/// created; if that fails the document is left untouched. A missing file
/// starts a fresh one-record history and needs no backup.
pub fn append_record(
    path: &Path,
    record: &HistoryRecord,
    at: DateTime<Utc>,
) -> Result<AppendOutcome, HistoryError> {
    let existing = read_existing(path)?;
    let mut doc = match &existing {
        Some(bytes) => parse_document(path, bytes)?,
        None => HistoryDocument::default(),
    };

    let value = serde_json::to_value(record).map_err(HistoryError::Serialize)?;
    doc.history.insert(0, value);
    let payload = serde_json::to_vec_pretty(&doc).map_err(HistoryError::Serialize)?;

    let backup = match &existing {
        Some(bytes) => {
            let backup = write_backup(path, bytes, at)?;
            tracing::info!(backup = %backup.display(), "history backup written");
            Some(backup)
        }
        None => None,
    };

    write_document(path, &payload)?;
    tracing::info!(
        path = %path.display(),
        records = doc.history.len(),
        "history record prepended"
    );

    Ok(AppendOutcome {
        backup,
        history_len: doc.history.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_history.rs"]
mod tests;
