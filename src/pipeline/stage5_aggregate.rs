use std::collections::BTreeMap;

use crate::model::entry::Cohort;
use crate::model::history::{HistoryRecord, HistoryRow};
use crate::pipeline::stage4_scores::ScoredEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct CohortAggregate {
    pub cohort: Cohort,
    pub model_count: usize,
    pub total_unified: f64,
    pub avg_unified: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry {
    pub model: String,
    pub cohort: Cohort,
    pub unified: f64,
    pub capability: f64,
    pub cost_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortSummary {
    pub aggregates: Vec<CohortAggregate>,
    pub top: BTreeMap<Cohort, Vec<TopEntry>>,
}

/// Per-cohort totals over every scored member of the cohort, plus the
/// cohort's best `top_n` by unified score.
pub fn run_stage5(scored: &[ScoredEntry], top_n: usize) -> CohortSummary {
    let mut aggregates = Vec::with_capacity(Cohort::ALL.len());
    let mut top = BTreeMap::new();

    for cohort in Cohort::ALL {
        let members = scored
            .iter()
            .filter(|s| s.entry.cohort == cohort)
            .collect::<Vec<_>>();

        let total_unified = members.iter().fold(0.0, |acc, s| acc + s.score.unified);
        let avg_unified = if members.is_empty() {
            0.0
        } else {
            total_unified / members.len() as f64
        };
        aggregates.push(CohortAggregate {
            cohort,
            model_count: members.len(),
            total_unified,
            avg_unified,
        });

        let mut ranked = members;
        ranked.sort_by(|a, b| {
            b.score
                .unified
                .partial_cmp(&a.score.unified)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = ranked
            .into_iter()
            .take(top_n)
            .map(|s| TopEntry {
                model: s.entry.name.clone(),
                cohort,
                unified: s.score.unified,
                capability: s.score.capability,
                cost_efficiency: s.score.cost_efficiency,
            })
            .collect::<Vec<_>>();
        top.insert(cohort, best);
    }

    CohortSummary { aggregates, top }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStanding {
    pub cohort: Cohort,
    pub members: usize,
    pub total: f64,
    pub avg_iq: f64,
    pub avg_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamScoreboard {
    pub timestamp: String,
    pub standings: Vec<TeamStanding>,
    pub leader: Cohort,
}

/// Headline "team total": only rows inside the combined top `top_n` count
/// towards their cohort. This is a different number from
/// [`CohortAggregate::total_unified`] and the two must not be merged.
pub fn team_scoreboard(record: &HistoryRecord, top_n: usize) -> TeamScoreboard {
    let mut rows: Vec<&HistoryRow> = record.rows().collect();
    rows.sort_by(|a, b| {
        b.unified
            .partial_cmp(&a.unified)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(top_n);

    let standings = Cohort::ALL
        .iter()
        .map(|&cohort| {
            let members = rows
                .iter()
                .filter(|r| r.origin == cohort)
                .collect::<Vec<_>>();
            let n = members.len();
            let total = members.iter().fold(0.0, |acc, r| acc + r.unified);
            let (avg_iq, avg_value) = if n == 0 {
                (0.0, 0.0)
            } else {
                (
                    members.iter().map(|r| r.avg_iq).sum::<f64>() / n as f64,
                    members.iter().map(|r| r.value).sum::<f64>() / n as f64,
                )
            };
            TeamStanding {
                cohort,
                members: n,
                total,
                avg_iq,
                avg_value,
            }
        })
        .collect::<Vec<_>>();

    // max_by keeps the last maximum, so a tie goes to the later cohort.
    let leader = standings
        .iter()
        .max_by(|a, b| {
            a.total
                .partial_cmp(&b.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.cohort)
        .unwrap_or(Cohort::Cn);

    TeamScoreboard {
        timestamp: record.timestamp.clone(),
        standings,
        leader,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_aggregate.rs"]
mod tests;
