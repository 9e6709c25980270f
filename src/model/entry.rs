use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cohort {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "CN")]
    Cn,
}

impl Cohort {
    pub const ALL: [Cohort; 2] = [Cohort::Us, Cohort::Cn];

    pub fn label(self) -> &'static str {
        match self {
            Cohort::Us => "US",
            Cohort::Cn => "CN",
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            Cohort::Us => "us",
            Cohort::Cn => "cn",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One model's raw observation from a scrape batch.
///
/// `fields` is keyed by the table header text; values are left exactly as
/// scraped so that participation can be judged on the raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub cohort: Cohort,
    pub source_url: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub company_link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_date: String,
}

impl LeaderboardEntry {
    pub fn new(rank: u32, name: &str, cohort: Cohort, source_url: &str) -> Self {
        Self {
            rank,
            name: name.to_string(),
            cohort,
            source_url: source_url.to_string(),
            fields: BTreeMap::new(),
            company: String::new(),
            company_link: String::new(),
            description: String::new(),
            created_date: String::new(),
        }
    }

    pub fn with_field(mut self, header: &str, value: &str) -> Self {
        self.fields.insert(header.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }
}

/// Metadata gathered by the detail-page pass, joined back by model name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Enrichment {
    pub name: String,
    pub company: String,
    pub company_link: String,
    pub description: String,
    pub created_date: String,
}
