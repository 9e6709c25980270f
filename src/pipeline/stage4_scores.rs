use crate::model::entry::LeaderboardEntry;
use crate::model::profile::ScoringProfile;
use crate::model::scores::{DerivedScore, NormalizationContext};
use crate::pipeline::stage1_coerce::{CellValue, classify_cell, parse_to_number};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub entry: LeaderboardEntry,
    pub score: DerivedScore,
}

#[derive(Debug)]
pub struct Stage4Output {
    pub scored: Vec<ScoredEntry>,
}

/// Scores one entry. Only benchmarks listed in `ctx.qualifying` are looked
/// up; anything else in the entry's field bag is ignored.
pub fn score_entry(
    entry: &LeaderboardEntry,
    ctx: &NormalizationContext,
    profile: &ScoringProfile,
) -> DerivedScore {
    let mut total_weighted = 0.0f64;
    let mut weight_sum = 0.0f64;

    for b in &ctx.qualifying {
        let mut score = match classify_cell(entry.raw(b)) {
            CellValue::Missing => continue,
            CellValue::Number(v) => v,
        };
        if let Some(bounds) = ctx.benchmark_bounds.get(b) {
            score = bounds.rescale(score);
        }
        let weight = ctx.weight(b);
        total_weighted += score * weight;
        weight_sum += weight;
    }

    let capability = if weight_sum > 0.0 {
        total_weighted / weight_sum
    } else {
        0.0
    };

    let total_cost = parse_to_number(entry.raw(profile.input_cost_column))
        + parse_to_number(entry.raw(profile.output_cost_column));
    let cost_efficiency = if total_cost > 0.0 {
        capability / total_cost
    } else {
        0.0
    };

    let norm_capability = match ctx.capability_bounds {
        Some(b) => b.rescale(capability),
        None => capability,
    };
    let norm_cost_efficiency = match ctx.cost_efficiency_bounds {
        Some(b) => b.rescale(cost_efficiency),
        None => cost_efficiency,
    };

    let unified = (norm_capability * profile.capability_weight
        + norm_cost_efficiency * profile.cost_efficiency_weight)
        * profile.unified_scale;

    DerivedScore {
        raw_weighted_total: total_weighted,
        capability,
        cost_efficiency,
        unified,
    }
}

/// Scores the batch and orders it by unified score, highest first. Equal
/// scores keep their input order.
pub fn run_stage4(
    entries: Vec<LeaderboardEntry>,
    ctx: &NormalizationContext,
    profile: &ScoringProfile,
) -> Stage4Output {
    let mut scored = entries
        .into_iter()
        .map(|entry| {
            let score = score_entry(&entry, ctx, profile);
            ScoredEntry { entry, score }
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| {
        b.score
            .unified
            .partial_cmp(&a.score.unified)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Stage4Output { scored }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_scores.rs"]
mod tests;
