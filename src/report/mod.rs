pub mod csv;
pub mod json;
pub mod text;

use crate::model::entry::LeaderboardEntry;

/// Leading identity columns of every export; table headers with the same
/// names are not repeated after them.
pub const IDENTITY_COLUMNS: [&str; 3] = ["Rank", "Model", "Country"];
pub const DERIVED_COLUMNS: [&str; 3] = ["AvgIQ", "Value", "Unified"];

/// Rounds half away from zero to two decimals. Only applied when a value is
/// surfaced; scoring keeps full precision.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn format_2dp(v: f64) -> String {
    format!("{:.2}", round2(v))
}

/// Truncates to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Raw table columns carried into exports: non-blank, not an identity
/// column, first occurrence only.
pub fn export_columns(headers: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for h in headers {
        if h.trim().is_empty() || IDENTITY_COLUMNS.contains(&h.as_str()) || out.contains(h) {
            continue;
        }
        out.push(h.clone());
    }
    out
}

/// Cell text for a raw column. `URL` comes from the entry's source link.
pub fn column_value(entry: &LeaderboardEntry, header: &str) -> String {
    if header == "URL" {
        return entry.source_url.clone();
    }
    entry.fields.get(header).cloned().unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
