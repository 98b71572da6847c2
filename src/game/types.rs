//! Core domain types for the word-search game.

use crate::error::GameError;
use chrono::NaiveDate;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One cell of the letter grid, identified by `(row, col)`.
///
/// Value type: equality, ordering, and hashing are by coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, new,
)]
pub struct Position {
    /// Row index, 0-based from the top.
    pub row: i32,
    /// Column index, 0-based from the left.
    pub col: i32,
}

/// Rectangular grid of letters.
///
/// Invariant: at least one row, and all rows have the same non-zero
/// length. Dimensions are fixed for a puzzle's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    /// Builds a grid from rows of cells.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedGrid`] if there are no rows, if any
    /// row is empty, or if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<char>>) -> Result<Self, GameError> {
        let width = match rows.first() {
            Some(row) => row.len(),
            None => return Err(GameError::malformed_grid("grid has no rows")),
        };
        if width == 0 {
            return Err(GameError::malformed_grid("grid rows are empty"));
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GameError::malformed_grid(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Returns the letter at `pos`, or `None` if `pos` is outside the grid.
    pub fn get(&self, pos: Position) -> Option<char> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        self.rows
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
            .copied()
    }

    /// Whether `pos` lies within `[0, height) × [0, width)`.
    pub fn contains(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }
}

impl FromStr for Grid {
    type Err = GameError;

    /// Parses the stored text form: cells comma-separated, rows
    /// semicolon-separated (`"N,A,T;S,X,P"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (row_index, row_text) in s.split(';').enumerate() {
            let mut row = Vec::new();
            for cell in row_text.split(',') {
                let cell = cell.trim();
                let mut chars = cell.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter), None) => row.push(letter),
                    _ => {
                        return Err(GameError::malformed_grid(format!(
                            "row {} has cell {:?}, expected a single letter",
                            row_index, cell
                        )));
                    }
                }
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

impl fmt::Display for Grid {
    /// Prints the stored text form accepted by [`Grid::from_str`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        write!(f, "{}", rows.join(";"))
    }
}

/// A target word in a puzzle.
///
/// The text is stored in canonical uppercase form; all comparisons
/// throughout the engine are case-insensitive by way of this
/// canonicalization. The optional start/end positions locate the word in
/// the grid for highlighting and are never consulted by matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Word {
    text: String,
    definition: String,
    found: bool,
    start_position: Option<Position>,
    end_position: Option<Position>,
}

impl Word {
    /// Creates a word, canonicalizing the text to uppercase.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().to_uppercase(),
            definition: String::new(),
            found: false,
            start_position: None,
            end_position: None,
        }
    }

    /// Attaches a definition string.
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// Records where the word sits in the grid (for highlighting).
    pub fn with_span(mut self, start: Position, end: Position) -> Self {
        self.start_position = Some(start);
        self.end_position = Some(end);
        self
    }
}

/// Puzzle difficulty rating.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    /// Short words, small grid.
    Easy,
    /// The default rating.
    #[default]
    Normal,
    /// Longer words, denser grid.
    Hard,
    /// The hardest rating.
    Master,
}

/// Presentation variant a puzzle is played under.
///
/// Modes alter presentation only; selection and matching rules are
/// identical across all of them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// Plain presentation.
    #[default]
    Normal,
    /// Mirrored grid rendering.
    Mirror,
    /// Letters fade in and out.
    Mist,
    /// Rune-styled glyphs.
    Rune,
    /// Word list hidden until found.
    Stealth,
}

/// A complete puzzle: grid, word list, and presentation metadata.
///
/// Immutable once loaded; the session reads it but never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Puzzle {
    id: String,
    theme_id: String,
    title: String,
    description: String,
    words: Vec<Word>,
    grid: Grid,
    date: NaiveDate,
    difficulty: Difficulty,
    mode: GameMode,
    insight: String,
    companion_message: String,
}

impl Puzzle {
    /// Creates a puzzle with default difficulty, mode, and flavor text.
    pub fn new(
        id: impl Into<String>,
        theme_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        words: Vec<Word>,
        grid: Grid,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            theme_id: theme_id.into(),
            title: title.into(),
            description: description.into(),
            words,
            grid,
            date,
            difficulty: Difficulty::default(),
            mode: GameMode::default(),
            insight: String::new(),
            companion_message: String::new(),
        }
    }

    /// Sets the difficulty rating.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the presentation mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the narrative flavor text shown around the puzzle.
    pub fn with_flavor(
        mut self,
        insight: impl Into<String>,
        companion_message: impl Into<String>,
    ) -> Self {
        self.insight = insight.into();
        self.companion_message = companion_message.into();
        self
    }

    /// Number of words in the puzzle.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// Persisted record of one puzzle's play state.
///
/// One record per puzzle; each save replaces the previous record
/// outright, so the latest save is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PuzzleProgress {
    puzzle_id: String,
    found_words: Vec<Word>,
    time_spent: u64,
    completed: bool,
    score: u32,
}

impl PuzzleProgress {
    /// The found words as a set of canonical uppercase texts.
    pub fn found_texts(&self) -> BTreeSet<String> {
        self.found_words
            .iter()
            .map(|word| word.text().to_uppercase())
            .collect()
    }
}
