use std::path::Path;

use crate::input::{InputError, read_json};
use crate::model::entry::{Enrichment, LeaderboardEntry};

pub const COMPANY_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

pub fn load_enrichment(path: &Path) -> Result<Vec<Enrichment>, InputError> {
    read_json(path)
}

/// Joins detail-page metadata onto entries by exact model name. Blank values
/// never overwrite what the entry already has. Returns the number of entries
/// that received metadata.
pub fn merge_enrichment(entries: &mut [LeaderboardEntry], records: &[Enrichment]) -> usize {
    let mut merged = 0usize;
    for record in records {
        let mut matched = false;
        for entry in entries.iter_mut().filter(|e| e.name == record.name) {
            matched = true;
            set_if_present(&mut entry.company, &record.company, COMPANY_MAX_CHARS);
            set_if_present(&mut entry.company_link, &record.company_link, usize::MAX);
            set_if_present(
                &mut entry.description,
                &record.description,
                DESCRIPTION_MAX_CHARS,
            );
            set_if_present(&mut entry.created_date, &record.created_date, usize::MAX);
            merged += 1;
        }
        if !matched {
            tracing::warn!(model = %record.name, "enrichment for unknown model ignored");
        }
    }

    for entry in entries.iter_mut() {
        if entry.company_link.is_empty() {
            entry.company_link = entry.source_url.clone();
        }
    }
    merged
}

fn set_if_present(target: &mut String, value: &str, max_chars: usize) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    *target = value.chars().take(max_chars).collect();
}
