use super::*;
use crate::model::entry::LeaderboardEntry;
use crate::model::scores::DerivedScore;
use serde_json::Map;

fn scored(name: &str, cohort: Cohort, unified: f64) -> ScoredEntry {
    ScoredEntry {
        entry: LeaderboardEntry::new(1, name, cohort, "https://example.test/m"),
        score: DerivedScore {
            raw_weighted_total: 0.0,
            capability: unified / 10.0,
            cost_efficiency: 1.0,
            unified,
        },
    }
}

fn row(name: &str, origin: Cohort, unified: f64, avg_iq: f64, value: f64) -> HistoryRow {
    HistoryRow {
        model: name.to_string(),
        company: String::new(),
        link: String::new(),
        origin,
        description: String::new(),
        created: String::new(),
        total: 0.0,
        avg_iq,
        value,
        unified,
        columns: Map::new(),
    }
}

#[test]
fn test_cohort_totals_and_averages() {
    let batch = vec![
        scored("u1", Cohort::Us, 700.0),
        scored("c1", Cohort::Cn, 600.0),
        scored("u2", Cohort::Us, 300.0),
        scored("c2", Cohort::Cn, 0.0),
        scored("c3", Cohort::Cn, 300.0),
    ];
    let summary = run_stage5(&batch, 3);
    let us = &summary.aggregates[0];
    let cn = &summary.aggregates[1];
    assert_eq!(us.cohort, Cohort::Us);
    assert_eq!(us.model_count, 2);
    assert!((us.total_unified - 1000.0).abs() < 1e-12);
    assert!((us.avg_unified - 500.0).abs() < 1e-12);
    assert_eq!(cn.model_count, 3);
    assert!((cn.total_unified - 900.0).abs() < 1e-12);
    assert!((cn.avg_unified - 300.0).abs() < 1e-12);
}

#[test]
fn test_top_n_order_with_stable_ties() {
    let batch = vec![
        scored("c1", Cohort::Cn, 100.0),
        scored("c2", Cohort::Cn, 500.0),
        scored("c3", Cohort::Cn, 100.0),
        scored("c4", Cohort::Cn, 100.0),
    ];
    let summary = run_stage5(&batch, 3);
    let names = summary.top[&Cohort::Cn]
        .iter()
        .map(|t| t.model.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["c2", "c1", "c3"]);
}

#[test]
fn test_empty_cohort_reports_zero() {
    let batch = vec![scored("u1", Cohort::Us, 400.0)];
    let summary = run_stage5(&batch, 3);
    let cn = summary
        .aggregates
        .iter()
        .find(|a| a.cohort == Cohort::Cn)
        .unwrap();
    assert_eq!(cn.model_count, 0);
    assert_eq!(cn.total_unified.to_bits(), 0.0f64.to_bits());
    assert_eq!(cn.avg_unified.to_bits(), 0.0f64.to_bits());
    assert!(summary.top[&Cohort::Cn].is_empty());
}

#[test]
fn test_scoreboard_counts_only_global_top_n() {
    let mut cohorts = std::collections::BTreeMap::new();
    cohorts.insert(
        Cohort::Us,
        vec![
            row("u1", Cohort::Us, 900.0, 90.0, 10.0),
            row("u2", Cohort::Us, 100.0, 10.0, 2.0),
        ],
    );
    cohorts.insert(
        Cohort::Cn,
        vec![
            row("c1", Cohort::Cn, 800.0, 80.0, 40.0),
            row("c2", Cohort::Cn, 700.0, 70.0, 20.0),
        ],
    );
    let record = HistoryRecord {
        timestamp: "2026-10-19T12:00:00+00:00".to_string(),
        cohorts,
    };

    let board = team_scoreboard(&record, 3);
    let us = &board.standings[0];
    let cn = &board.standings[1];
    assert_eq!(us.members, 1);
    assert!((us.total - 900.0).abs() < 1e-12);
    assert!((us.avg_iq - 90.0).abs() < 1e-12);
    assert_eq!(cn.members, 2);
    assert!((cn.total - 1500.0).abs() < 1e-12);
    assert!((cn.avg_value - 30.0).abs() < 1e-12);
    assert_eq!(board.leader, Cohort::Cn);

    // The per-cohort aggregate over the full set is a different number.
    let full_us: f64 = record.cohorts[&Cohort::Us].iter().map(|r| r.unified).sum();
    assert!((full_us - us.total).abs() > 1.0);
}

#[test]
fn test_scoreboard_tie_goes_to_cn() {
    let mut cohorts = std::collections::BTreeMap::new();
    cohorts.insert(Cohort::Us, vec![row("u1", Cohort::Us, 500.0, 1.0, 1.0)]);
    cohorts.insert(Cohort::Cn, vec![row("c1", Cohort::Cn, 500.0, 1.0, 1.0)]);
    let record = HistoryRecord {
        timestamp: String::new(),
        cohorts,
    };
    assert_eq!(team_scoreboard(&record, 10).leader, Cohort::Cn);
}

#[test]
fn test_scoreboard_empty_cohort_averages_zero() {
    let mut cohorts = std::collections::BTreeMap::new();
    cohorts.insert(Cohort::Us, vec![row("u1", Cohort::Us, 500.0, 50.0, 5.0)]);
    let record = HistoryRecord {
        timestamp: String::new(),
        cohorts,
    };
    let board = team_scoreboard(&record, 10);
    assert_eq!(board.standings[1].members, 0);
    assert_eq!(board.standings[1].total.to_bits(), 0.0f64.to_bits());
    assert_eq!(board.standings[1].avg_iq.to_bits(), 0.0f64.to_bits());
    assert_eq!(board.standings[1].avg_value.to_bits(), 0.0f64.to_bits());
    assert_eq!(board.leader, Cohort::Us);
}
