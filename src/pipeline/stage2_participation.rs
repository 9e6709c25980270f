use std::collections::BTreeMap;

use crate::model::entry::LeaderboardEntry;
use crate::pipeline::stage1_coerce::is_missing;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Participation {
    pub counts: BTreeMap<String, usize>,
    pub max: usize,
}

impl Participation {
    pub fn count(&self, benchmark: &str) -> usize {
        self.counts.get(benchmark).copied().unwrap_or(0)
    }

    /// Benchmarks reported by more than one entry, in header order.
    pub fn qualifying(&self, headers: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for h in headers {
            if self.count(h) > 1 && !out.contains(h) {
                out.push(h.clone());
            }
        }
        out
    }
}

pub fn run_stage2(entries: &[LeaderboardEntry], benchmark_headers: &[String]) -> Participation {
    let mut counts: BTreeMap<String, usize> = benchmark_headers
        .iter()
        .map(|h| (h.clone(), 0usize))
        .collect();

    for entry in entries {
        for (header, count) in counts.iter_mut() {
            if !is_missing(entry.raw(header)) {
                *count += 1;
            }
        }
    }

    let max = counts.values().copied().max().unwrap_or(0).max(1);

    for (header, count) in &counts {
        if *count <= 1 {
            tracing::debug!(benchmark = %header, participants = count, "benchmark excluded from scoring");
        }
    }

    Participation { counts, max }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_participation.rs"]
mod tests;
