use serde_json::{Map, Value, json};

use crate::pipeline::stage4_scores::ScoredEntry;
use crate::pipeline::stage5_aggregate::{CohortSummary, TeamScoreboard};
use crate::report::{DERIVED_COLUMNS, column_value, round2};

/// Combined export: one object per entry, keys in the same order as the CSV.
pub fn render_rows_json(columns: &[String], scored: &[ScoredEntry]) -> serde_json::Result<String> {
    let rows = scored
        .iter()
        .map(|s| {
            let mut row = Map::new();
            row.insert("Rank".to_string(), json!(s.entry.rank));
            row.insert("Model".to_string(), json!(s.entry.name));
            row.insert("Country".to_string(), json!(s.entry.cohort.label()));
            for c in columns {
                row.insert(c.clone(), Value::String(column_value(&s.entry, c)));
            }
            let derived = [s.score.capability, s.score.cost_efficiency, s.score.unified];
            for (key, v) in DERIVED_COLUMNS.iter().zip(derived) {
                row.insert(key.to_string(), json!(round2(v)));
            }
            Value::Object(row)
        })
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&rows)
}

pub fn render_summary_json(summary: &CohortSummary) -> serde_json::Result<String> {
    let mut aggregates = Map::new();
    for a in &summary.aggregates {
        aggregates.insert(
            a.cohort.label().to_string(),
            json!({
                "cohort": a.cohort.label(),
                "modelCount": a.model_count,
                "totalUnified": round2(a.total_unified),
                "avgUnified": round2(a.avg_unified),
            }),
        );
    }

    let mut top3 = Map::new();
    for (cohort, entries) in &summary.top {
        let rows = entries
            .iter()
            .map(|t| {
                json!({
                    "Model": t.model,
                    "Country": t.cohort.label(),
                    "Unified": round2(t.unified),
                    "AvgIQ": round2(t.capability),
                    "Value": round2(t.cost_efficiency),
                })
            })
            .collect::<Vec<_>>();
        top3.insert(cohort.label().to_string(), Value::Array(rows));
    }

    serde_json::to_string_pretty(&json!({
        "aggregates": aggregates,
        "top3": top3,
    }))
}

pub fn render_scoreboard_json(board: &TeamScoreboard) -> serde_json::Result<String> {
    let mut teams = Map::new();
    for s in &board.standings {
        teams.insert(
            s.cohort.label().to_string(),
            json!({
                "members": s.members,
                "total": round2(s.total),
                "avgIq": (s.avg_iq * 10.0).round() / 10.0,
                "avgValue": (s.avg_value * 10.0).round() / 10.0,
            }),
        );
    }
    serde_json::to_string_pretty(&json!({
        "timestamp": board.timestamp,
        "leader": board.leader.label(),
        "teams": teams,
    }))
}
