use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::entry::Cohort;
use crate::pipeline::stage4_scores::ScoredEntry;
use crate::pipeline::stage5_aggregate::CohortSummary;
use crate::report::csv::render_csv;
use crate::report::json::{render_rows_json, render_summary_json};
use crate::report::text::render_table;
use crate::report::{DERIVED_COLUMNS, IDENTITY_COLUMNS, column_value, export_columns, format_2dp};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Stage7Input<'a> {
    pub scored: &'a [ScoredEntry],
    pub headers: &'a [String],
    pub summary: &'a CohortSummary,
    pub max_col_width: usize,
}

pub const MODEL_COL_EXTRA: usize = 5;

pub fn write_reports(input: &Stage7Input<'_>, out_dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let columns = export_columns(input.headers);
    let mut written = Vec::new();

    let path = out_dir.join("leaderboard_combined.csv");
    write_text(&path, &render_export_csv(&columns, input.scored))?;
    written.push(path);

    for cohort in Cohort::ALL {
        let members = input
            .scored
            .iter()
            .filter(|s| s.entry.cohort == cohort)
            .cloned()
            .collect::<Vec<_>>();
        let path = out_dir.join(format!("leaderboard_{}.csv", cohort.file_suffix()));
        write_text(&path, &render_export_csv(&columns, &members))?;
        written.push(path);
    }

    let path = out_dir.join("leaderboard_combined.json");
    let json = render_rows_json(&columns, input.scored).map_err(|source| ReportError::Json {
        path: path.clone(),
        source,
    })?;
    write_text(&path, &json)?;
    written.push(path);

    let path = out_dir.join("cohort_aggregates.csv");
    write_text(&path, &render_aggregates_csv(input.summary))?;
    written.push(path);

    let path = out_dir.join("summary.json");
    let json = render_summary_json(input.summary).map_err(|source| ReportError::Json {
        path: path.clone(),
        source,
    })?;
    write_text(&path, &json)?;
    written.push(path);

    let path = out_dir.join("report.txt");
    let table = render_table(
        "Top Models (US + CN) by Unified Score",
        input.scored,
        input.max_col_width,
        MODEL_COL_EXTRA,
    );
    write_text(&path, &table)?;
    written.push(path);

    for p in &written {
        tracing::info!(path = %p.display(), "report written");
    }
    Ok(written)
}

pub fn render_export_csv(columns: &[String], scored: &[ScoredEntry]) -> String {
    let header = IDENTITY_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .chain(columns.iter().cloned())
        .chain(DERIVED_COLUMNS.iter().map(|s| s.to_string()))
        .collect::<Vec<_>>();

    let rows = scored
        .iter()
        .map(|s| {
            let mut row = Vec::with_capacity(header.len());
            row.push(s.entry.rank.to_string());
            row.push(s.entry.name.clone());
            row.push(s.entry.cohort.label().to_string());
            for c in columns {
                row.push(column_value(&s.entry, c));
            }
            row.push(format_2dp(s.score.capability));
            row.push(format_2dp(s.score.cost_efficiency));
            row.push(format_2dp(s.score.unified));
            row
        })
        .collect::<Vec<_>>();

    render_csv(&header, &rows)
}

pub fn render_aggregates_csv(summary: &CohortSummary) -> String {
    let header = ["Country", "Models", "TotalUnified", "AvgUnified"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let rows = summary
        .aggregates
        .iter()
        .map(|a| {
            vec![
                a.cohort.label().to_string(),
                a.model_count.to_string(),
                format_2dp(a.total_unified),
                format_2dp(a.avg_unified),
            ]
        })
        .collect::<Vec<_>>();
    render_csv(&header, &rows)
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    let wrap = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(wrap)?);
    w.write_all(contents.as_bytes()).map_err(wrap)?;
    w.flush().map_err(wrap)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_report.rs"]
mod tests;
