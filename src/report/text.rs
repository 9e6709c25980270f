use crate::pipeline::stage4_scores::ScoredEntry;
use crate::report::{format_2dp, truncate_chars};

const TABLE_HEADERS: [&str; 7] = [
    "Rank",
    "Model",
    "Country",
    "Organization",
    "AvgIQ",
    "Value",
    "Unified",
];

/// Fixed-width comparison table. Every column is cut to `max_col_width`
/// characters, the model column gets `model_col_extra` more.
pub fn render_table(
    title: &str,
    scored: &[ScoredEntry],
    max_col_width: usize,
    model_col_extra: usize,
) -> String {
    let mut widths = [max_col_width; TABLE_HEADERS.len()];
    widths[1] = max_col_width + model_col_extra;

    let rule = "=".repeat(80);
    let mut lines = Vec::with_capacity(scored.len() + 6);
    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(title.to_string());
    lines.push(rule.clone());

    let header = format_row(TABLE_HEADERS.iter().map(|h| h.to_string()), &widths);
    let underline = "-".repeat(header.chars().count());
    lines.push(header);
    lines.push(underline);

    for s in scored {
        let organization = s
            .entry
            .fields
            .get("Organization")
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| s.entry.company.clone());
        let cells = [
            s.entry.rank.to_string(),
            s.entry.name.clone(),
            s.entry.cohort.label().to_string(),
            organization,
            format_2dp(s.score.capability),
            format_2dp(s.score.cost_efficiency),
            format_2dp(s.score.unified),
        ];
        lines.push(format_row(cells.into_iter(), &widths));
    }

    lines.push(rule);
    lines.push(String::new());
    lines.join("\n")
}

fn format_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &w)| format!("{:<w$}", truncate_chars(&cell, w)))
        .collect::<Vec<_>>()
        .join(" | ")
}
