use std::collections::BTreeMap;
use std::path::Path;

use crate::input::{InputError, read_json};
use crate::model::entry::LeaderboardEntry;
use crate::model::profile::GLOBAL_RANK_COLUMN;

pub fn load_global_ranks(path: &Path) -> Result<BTreeMap<String, u32>, InputError> {
    read_json(path)
}

/// Replaces the scrape-order rank with the unfiltered leaderboard position
/// where the model appears there. Returns how many entries were ranked.
pub fn apply_global_ranks(entries: &mut [LeaderboardEntry], ranks: &BTreeMap<String, u32>) -> usize {
    let mut ranked = 0usize;
    for entry in entries.iter_mut() {
        match ranks.get(&entry.name) {
            Some(&rank) => {
                entry.rank = rank;
                entry
                    .fields
                    .insert(GLOBAL_RANK_COLUMN.to_string(), rank.to_string());
                ranked += 1;
            }
            None => {
                entry
                    .fields
                    .insert(GLOBAL_RANK_COLUMN.to_string(), "N/A".to_string());
            }
        }
    }
    ranked
}
