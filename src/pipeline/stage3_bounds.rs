use std::collections::BTreeMap;

use crate::model::entry::LeaderboardEntry;
use crate::model::profile::ScoringProfile;
use crate::model::scores::{Bounds, NormalizationContext};
use crate::pipeline::stage1_coerce::{CellValue, classify_cell};
use crate::pipeline::stage2_participation::Participation;
use crate::pipeline::stage4_scores::score_entry;

/// Min/max of the coerced values per qualifying benchmark, over the whole
/// candidate set. Benchmarks nobody reports get no entry.
pub fn benchmark_bounds(
    entries: &[LeaderboardEntry],
    qualifying: &[String],
) -> BTreeMap<String, Bounds> {
    let mut out = BTreeMap::new();
    for b in qualifying {
        let values = entries.iter().filter_map(|e| match classify_cell(e.raw(b)) {
            CellValue::Number(v) => Some(v),
            CellValue::Missing => None,
        });
        if let Some(bounds) = Bounds::from_values(values) {
            out.insert(b.clone(), bounds);
        }
    }
    out
}

/// Builds the per-run context in two passes: the first scores every entry
/// with per-benchmark bounds only, and the spread of those capability and
/// cost-efficiency values becomes the global bounds used by the second.
pub fn run_stage3(
    entries: &[LeaderboardEntry],
    benchmark_headers: &[String],
    participation: &Participation,
    profile: &ScoringProfile,
) -> NormalizationContext {
    let qualifying = participation.qualifying(benchmark_headers);
    let benchmark_bounds = benchmark_bounds(entries, &qualifying);

    let mut ctx = NormalizationContext {
        qualifying,
        participation: participation.counts.clone(),
        max_participation: participation.max.max(1),
        benchmark_bounds,
        capability_bounds: None,
        cost_efficiency_bounds: None,
    };

    let first_pass = entries
        .iter()
        .map(|e| score_entry(e, &ctx, profile))
        .collect::<Vec<_>>();

    ctx.capability_bounds = Bounds::from_values(first_pass.iter().map(|s| s.capability));
    ctx.cost_efficiency_bounds = Bounds::from_values(first_pass.iter().map(|s| s.cost_efficiency));

    for (name, bounds) in &ctx.benchmark_bounds {
        tracing::debug!(benchmark = %name, min = bounds.min, max = bounds.max, "benchmark bounds");
    }
    tracing::debug!(
        capability = ?ctx.capability_bounds,
        cost_efficiency = ?ctx.cost_efficiency_bounds,
        "global bounds from first pass"
    );

    ctx
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_bounds.rs"]
mod tests;
