//! Streak module - escalating-merge bookkeeping
//!
//! A streak grows while consecutive moves keep producing merges of ever
//! higher value:
//! - A merge *qualifies* when its resulting value is at least the configured
//!   minimum (4 by default) and strictly greater than the last qualifying
//!   merge's value.
//! - Every qualifying merge extends the streak by one, even several in the
//!   same move.
//! - A board-changing move with no qualifying merge resets the streak, even
//!   if it merged something.
//!
//! Moves that change nothing never touch the streak.

use serde::{Deserialize, Serialize};

use crate::resolver::MergeEvent;
use crate::types::Rank;

/// Current streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakState {
    last_merged_rank: Option<Rank>,
    count: u32,
}

impl StreakState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_merged_rank(&self) -> Option<Rank> {
        self.last_merged_rank
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if a merge producing `rank` would extend the streak
    pub fn qualifies(&self, rank: Rank, min_value: u32) -> bool {
        rank.value() >= min_value
            && self
                .last_merged_rank
                .map_or(true, |last| rank.value() > last.value())
    }

    /// Fold one board-changing move's merges into the streak
    ///
    /// Returns true if at least one merge extended it.
    pub fn record_move(&mut self, merges: &[MergeEvent], min_value: u32) -> bool {
        let mut extended = false;
        for merge in merges {
            if self.qualifies(merge.new_rank, min_value) {
                self.last_merged_rank = Some(merge.new_rank);
                self.count += 1;
                extended = true;
            }
        }

        if !extended {
            self.reset();
        }
        extended
    }
}
