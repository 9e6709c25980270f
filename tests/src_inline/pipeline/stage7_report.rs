use super::*;
use crate::model::entry::LeaderboardEntry;
use crate::model::scores::DerivedScore;
use crate::pipeline::stage5_aggregate::run_stage5;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("modelrace_report_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn scored(rank: u32, name: &str, cohort: Cohort, unified: f64) -> ScoredEntry {
    ScoredEntry {
        entry: LeaderboardEntry::new(rank, name, cohort, "https://example.test/m")
            .with_field("Organization", "Acme, Inc.")
            .with_field("GPQA", "81.3%")
            .with_field("Country", "ignored"),
        score: DerivedScore {
            raw_weighted_total: 1.0,
            capability: 81.333,
            cost_efficiency: 2.5,
            unified,
        },
    }
}

fn headers() -> Vec<String> {
    ["Rank", "Model", "Country", "Organization", "GPQA", "", "URL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_export_csv_columns_and_quoting() {
    let batch = vec![scored(4, "alpha \"pro\"", Cohort::Us, 700.0)];
    let columns = export_columns(&headers());
    let csv = render_export_csv(&columns, &batch);
    let mut lines = csv.split("\r\n");
    assert_eq!(
        lines.next().unwrap(),
        "Rank,Model,Country,Organization,GPQA,URL,AvgIQ,Value,Unified"
    );
    assert_eq!(
        lines.next().unwrap(),
        "4,\"alpha \"\"pro\"\"\",US,\"Acme, Inc.\",81.3%,https://example.test/m,81.33,2.50,700.00"
    );
}

#[test]
fn test_aggregates_csv_lists_empty_cohort() {
    let batch = vec![scored(1, "alpha", Cohort::Us, 700.0)];
    let summary = run_stage5(&batch, 3);
    let csv = render_aggregates_csv(&summary);
    assert_eq!(
        csv,
        "Country,Models,TotalUnified,AvgUnified\r\nUS,1,700.00,700.00\r\nCN,0,0.00,0.00\r\n"
    );

    let json = render_summary_json(&summary).unwrap();
    assert!(!json.contains("-0"), "{json}");
}

#[test]
fn test_write_reports_outputs() {
    let dir = make_temp_dir();
    let batch = vec![
        scored(1, "alpha", Cohort::Us, 700.0),
        scored(2, "qwen", Cohort::Cn, 350.0),
        scored(3, "beta", Cohort::Us, 0.0),
    ];
    let summary = run_stage5(&batch, 3);
    let h = headers();
    let input = Stage7Input {
        scored: &batch,
        headers: &h,
        summary: &summary,
        max_col_width: 15,
    };
    let written = write_reports(&input, &dir).unwrap();
    assert_eq!(written.len(), 7);
    for p in &written {
        assert!(p.exists(), "{}", p.display());
    }

    let us_csv = fs::read_to_string(dir.join("leaderboard_us.csv")).unwrap();
    assert_eq!(us_csv.lines().count(), 3);
    let cn_csv = fs::read_to_string(dir.join("leaderboard_cn.csv")).unwrap();
    assert!(cn_csv.contains("qwen"));
    assert!(!cn_csv.contains("alpha"));

    let combined: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.join("leaderboard_combined.json")).unwrap(),
    )
    .unwrap();
    let first = &combined[0];
    assert_eq!(first["Model"], "alpha");
    assert_eq!(first["Country"], "US");
    assert_eq!(first["Unified"], 700.0);
    let keys = first.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
    assert_eq!(
        keys,
        vec![
            "Rank", "Model", "Country", "Organization", "GPQA", "URL", "AvgIQ", "Value",
            "Unified"
        ]
    );

    let summary_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary_json["aggregates"]["US"]["modelCount"], 2);
    assert_eq!(summary_json["aggregates"]["US"]["totalUnified"], 700.0);
    assert_eq!(summary_json["top3"]["US"][0]["Model"], "alpha");
    assert_eq!(summary_json["top3"]["CN"].as_array().unwrap().len(), 1);

    let report = fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("Top Models (US + CN) by Unified Score"));
    assert!(report.contains("Acme, Inc."));
}
