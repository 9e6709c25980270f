use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::entry::Cohort;

/// Flattened entry + score row as persisted in the history document.
///
/// Raw table columns follow the fixed keys; their names have spaces removed
/// and never shadow a fixed key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub model: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub link: String,
    pub origin: Cohort,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub avg_iq: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub unified: f64,
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

pub const ROW_FIXED_KEYS: &[&str] = &[
    "model",
    "company",
    "link",
    "origin",
    "description",
    "created",
    "total",
    "avgIq",
    "value",
    "unified",
];

/// One immutable snapshot. Existing documents store the cohort map under
/// `teams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    #[serde(rename = "teams", alias = "cohorts")]
    pub cohorts: BTreeMap<Cohort, Vec<HistoryRow>>,
}

impl HistoryRecord {
    pub fn rows(&self) -> impl Iterator<Item = &HistoryRow> {
        self.cohorts.values().flatten()
    }
}

/// The persisted `{history: [...]}` document, newest record first.
///
/// Older records are kept as raw JSON so that appending never rewrites them,
/// and unknown top-level keys survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HistoryDocument {
    pub fn latest(&self) -> Option<&Value> {
        self.history.first()
    }
}
