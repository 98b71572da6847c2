//! Word-search game logic: grid model, selection rules, matching, scoring.

mod matcher;
mod scoring;
mod selection;
mod types;

pub use matcher::{MatchOutcome, match_selection, resolve_selection};
pub use scoring::{TIME_BONUS_CEILING, WORD_POINTS, calculate_score, is_complete};
pub use selection::Selection;
pub use types::{Difficulty, GameMode, Grid, Position, Puzzle, PuzzleProgress, Word};
