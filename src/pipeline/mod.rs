pub mod stage1_coerce;
pub mod stage2_participation;
pub mod stage3_bounds;
pub mod stage4_scores;
pub mod stage5_aggregate;
pub mod stage6_history;
pub mod stage7_report;
