use crate::model::profile::ScoringProfile;

/// Scorable benchmark columns: every non-blank header outside the metadata
/// set, in table order, duplicates dropped.
pub fn benchmark_headers(all_headers: &[String], profile: &ScoringProfile) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for h in all_headers {
        if h.trim().is_empty() || profile.is_metadata_column(h) || out.contains(h) {
            continue;
        }
        out.push(h.clone());
    }
    out
}
