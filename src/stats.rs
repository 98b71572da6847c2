//! Player statistics and daily-streak arithmetic.

use chrono::NaiveDate;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Lifetime completion statistics for the player.
///
/// The streak counts consecutive days with at least one completed puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerStats {
    total_puzzles_completed: u32,
    current_streak: u32,
    longest_streak: u32,
    last_play_date: Option<NaiveDate>,
}

impl PlayerStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics after recording a puzzle completion on
    /// `today`.
    ///
    /// Streak rule: completing on the day after the last play extends the
    /// streak; completing again on the same day leaves it unchanged; any
    /// gap resets it to 1. The longest streak is the running maximum.
    pub fn record_completion(&self, today: NaiveDate) -> PlayerStats {
        let current_streak = match self.last_play_date {
            Some(last) if last == today => self.current_streak,
            Some(last) if (today - last).num_days() == 1 => self.current_streak + 1,
            _ => 1,
        };
        let updated = PlayerStats {
            total_puzzles_completed: self.total_puzzles_completed + 1,
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_play_date: Some(today),
        };
        info!(
            total = updated.total_puzzles_completed,
            streak = updated.current_streak,
            "Completion recorded"
        );
        updated
    }
}
