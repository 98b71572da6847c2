//! Stored row types with string-encoded columns.
//!
//! Columns follow the original mobile schema: word lists comma-joined,
//! the grid in its `"a,b;c,d"` text form, enums stored by name. The store
//! keeps these rows; sessions only ever see the domain types.

use crate::error::StoreError;
use crate::game::{Difficulty, GameMode, Grid, Puzzle, PuzzleProgress, Word};
use chrono::NaiveDate;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Stored row for a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PuzzleRecord {
    id: String,
    theme_id: String,
    title: String,
    description: String,
    words: String,
    definitions: String,
    grid: String,
    date: NaiveDate,
    difficulty: String,
    game_mode: String,
    insight: String,
    companion_message: String,
}

impl PuzzleRecord {
    /// Encodes a puzzle into its stored row.
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        let words = puzzle
            .words()
            .iter()
            .map(|word| word.text().clone())
            .collect::<Vec<_>>()
            .join(",");
        let definitions = puzzle
            .words()
            .iter()
            .map(|word| word.definition().clone())
            .collect::<Vec<_>>()
            .join(",");
        Self::new(
            puzzle.id().clone(),
            puzzle.theme_id().clone(),
            puzzle.title().clone(),
            puzzle.description().clone(),
            words,
            definitions,
            puzzle.grid().to_string(),
            *puzzle.date(),
            puzzle.difficulty().to_string(),
            puzzle.mode().to_string(),
            puzzle.insight().clone(),
            puzzle.companion_message().clone(),
        )
    }

    /// Decodes the stored row back into a puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the grid text or an enum name does not
    /// parse.
    #[instrument(skip(self), fields(puzzle_id = %self.id))]
    pub fn to_puzzle(&self) -> Result<Puzzle, StoreError> {
        let grid = Grid::from_str(&self.grid)?;
        let difficulty = Difficulty::from_str(&self.difficulty).map_err(|e| {
            StoreError::new(format!("invalid difficulty {:?}: {}", self.difficulty, e))
        })?;
        let mode = GameMode::from_str(&self.game_mode).map_err(|e| {
            StoreError::new(format!("invalid game mode {:?}: {}", self.game_mode, e))
        })?;

        let definitions: Vec<&str> = self.definitions.split(',').collect();
        let words: Vec<Word> = self
            .words
            .split(',')
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(index, text)| {
                Word::new(text).with_definition(definitions.get(index).copied().unwrap_or(""))
            })
            .collect();

        Ok(Puzzle::new(
            self.id.clone(),
            self.theme_id.clone(),
            self.title.clone(),
            self.description.clone(),
            words,
            grid,
            self.date,
        )
        .with_difficulty(difficulty)
        .with_mode(mode)
        .with_flavor(self.insight.clone(), self.companion_message.clone()))
    }
}

/// Stored row for a progress save. One row per puzzle; every save
/// replaces the previous row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct ProgressRecord {
    id: String,
    puzzle_id: String,
    found_words: String,
    time_spent: u64,
    completed: bool,
    score: u32,
    last_played: NaiveDate,
}

impl ProgressRecord {
    /// Encodes a progress value into its stored row. `id` distinguishes
    /// successive saves; `last_played` stamps the save date.
    pub fn from_progress(
        progress: &PuzzleProgress,
        id: impl Into<String>,
        last_played: NaiveDate,
    ) -> Self {
        let found_words = progress
            .found_words()
            .iter()
            .map(|word| word.text().clone())
            .collect::<Vec<_>>()
            .join(",");
        Self::new(
            id.into(),
            progress.puzzle_id().clone(),
            found_words,
            *progress.time_spent(),
            *progress.completed(),
            *progress.score(),
            last_played,
        )
    }

    /// Decodes the stored row back into a progress value. Only word
    /// texts are stored, so decoded words carry no definitions.
    pub fn to_progress(&self) -> PuzzleProgress {
        let found_words: Vec<Word> = self
            .found_words
            .split(',')
            .filter(|text| !text.is_empty())
            .map(Word::new)
            .collect();
        PuzzleProgress::new(
            self.puzzle_id.clone(),
            found_words,
            self.time_spent,
            self.completed,
            self.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{daily_sample_puzzle, sample_puzzle};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
    }

    #[test]
    fn test_puzzle_record_round_trip() {
        let puzzle = daily_sample_puzzle(date());
        let record = PuzzleRecord::from_puzzle(&puzzle);
        assert_eq!(record.difficulty(), "NORMAL");
        assert_eq!(record.game_mode(), "MIRROR");

        let decoded = record.to_puzzle().unwrap();
        assert_eq!(decoded.id(), puzzle.id());
        assert_eq!(decoded.grid(), puzzle.grid());
        assert_eq!(decoded.word_count(), puzzle.word_count());
        assert_eq!(decoded.words()[2].text(), "RIVER");
        assert_eq!(decoded.words()[2].definition(), "Natural flowing watercourse");
        assert_eq!(decoded.mode(), puzzle.mode());
    }

    #[test]
    fn test_generated_puzzle_round_trips_too() {
        let puzzle = sample_puzzle(date());
        let record = PuzzleRecord::from_puzzle(&puzzle);
        let decoded = record.to_puzzle().unwrap();
        assert_eq!(decoded.grid(), puzzle.grid());
        assert_eq!(decoded.words()[0].text(), "CODE");
    }

    #[test]
    fn test_bad_enum_rejected() {
        let record = PuzzleRecord::new(
            "p".into(),
            "t".into(),
            "T".into(),
            "D".into(),
            "CAT".into(),
            "feline".into(),
            "C,A,T".into(),
            date(),
            "GENTLE".into(),
            "NORMAL".into(),
            String::new(),
            String::new(),
        );
        assert!(record.to_puzzle().is_err());
    }

    #[test]
    fn test_progress_record_round_trip() {
        let progress = PuzzleProgress::new(
            "cat-1".to_string(),
            vec![Word::new("CAT"), Word::new("DOG")],
            72,
            false,
            1128,
        );
        let record = ProgressRecord::from_progress(&progress, "cat-1-3", date());
        assert_eq!(record.found_words(), "CAT,DOG");

        let decoded = record.to_progress();
        assert_eq!(decoded.found_texts(), progress.found_texts());
        assert_eq!(decoded.time_spent(), progress.time_spent());
        assert_eq!(decoded.completed(), progress.completed());
        assert_eq!(decoded.score(), progress.score());
    }

    #[test]
    fn test_empty_found_words_round_trip() {
        let progress = PuzzleProgress::new("p".to_string(), Vec::new(), 5, false, 995);
        let record = ProgressRecord::from_progress(&progress, "p-1", date());
        assert!(record.to_progress().found_words().is_empty());
    }
}
