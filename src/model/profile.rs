#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub missing_tokens: &'static [&'static str],
    pub metadata_columns: &'static [&'static str],
    pub input_cost_column: &'static str,
    pub output_cost_column: &'static str,
    pub capability_weight: f64,
    pub cost_efficiency_weight: f64,
    pub unified_scale: f64,
    pub cohort_top_n: usize,
    pub scoreboard_top_n: usize,
}

pub const MISSING_TOKENS: &[&str] = &["", "-", "n/a", "N/A", "null", "None"];

pub const METADATA_COLUMNS: &[&str] = &[
    "Rank",
    "Model",
    "Country",
    "License",
    "Context",
    "Input",
    "Output",
    "Speed",
    "Organization",
    "Created",
    "Description",
    "Input $/M",
    "Output $/M",
];

pub const GLOBAL_RANK_COLUMN: &str = "llm-stats ranking";

impl ScoringProfile {
    /// Constants every published history record was scored with. Changing
    /// any of them breaks comparability with older snapshots.
    pub fn v1() -> Self {
        Self {
            missing_tokens: MISSING_TOKENS,
            metadata_columns: METADATA_COLUMNS,
            input_cost_column: "Input $/M",
            output_cost_column: "Output $/M",
            capability_weight: 0.7,
            cost_efficiency_weight: 0.3,
            unified_scale: 10.0,
            cohort_top_n: 3,
            scoreboard_top_n: 10,
        }
    }

    pub fn is_metadata_column(&self, header: &str) -> bool {
        self.metadata_columns.contains(&header) || header == GLOBAL_RANK_COLUMN
    }
}
