//! Game session state: explicit phases, events, and a pure reducer.
//!
//! The session is a tagged union of phases (`Loading`, `InProgress`,
//! `Complete`, `Error`) advanced by [`reduce`], a pure function from
//! `(phase, event)` to the next phase plus a list of side-effect
//! commands. The transition table is testable with no runtime harness;
//! [`crate::runtime`] interprets the commands.

mod event;
mod reducer;

pub use event::{Command, SessionEvent, Step};
pub use reducer::reduce;

use crate::error::GameError;
use crate::game::{Position, Puzzle, PuzzleProgress, Selection, Word, calculate_score};
use crate::theme::{Theme, resolve_theme};
use derive_getters::Getters;
use std::collections::BTreeSet;

/// Mutable state shared by the `InProgress` and `Complete` phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGame {
    pub(crate) puzzle: Puzzle,
    pub(crate) selection: Selection,
    pub(crate) found: BTreeSet<String>,
    pub(crate) elapsed_secs: u64,
    pub(crate) themes: Vec<Theme>,
    pub(crate) active_theme: Option<Theme>,
}

impl ActiveGame {
    /// Builds game state for a freshly loaded puzzle.
    pub(crate) fn new(
        puzzle: Puzzle,
        found: BTreeSet<String>,
        elapsed_secs: u64,
        themes: Vec<Theme>,
    ) -> Self {
        let active_theme = resolve_theme(puzzle.theme_id(), &themes);
        Self {
            puzzle,
            selection: Selection::new(),
            found,
            elapsed_secs,
            themes,
            active_theme,
        }
    }

    /// The puzzle being played.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// The in-progress drag selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Canonical uppercase texts of the found words.
    pub fn found(&self) -> &BTreeSet<String> {
        &self.found
    }

    /// Elapsed play time in seconds.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        calculate_score(self.found.len(), self.elapsed_secs)
    }

    /// Whether every listed word has been found.
    pub fn is_complete(&self) -> bool {
        crate::game::is_complete(self.found.len(), self.puzzle.word_count())
    }

    /// Builds the progress record for the current state. Each save
    /// supersedes the previous record for this puzzle.
    pub fn to_progress(&self) -> PuzzleProgress {
        let found_words: Vec<Word> = self.found.iter().map(|text| Word::new(text.clone())).collect();
        PuzzleProgress::new(
            self.puzzle.id().clone(),
            found_words,
            self.elapsed_secs,
            self.is_complete(),
            self.score(),
        )
    }

    /// Clears found words, elapsed time, and the selection: a full
    /// session reset on the same puzzle.
    pub(crate) fn reset(&mut self) {
        self.found.clear();
        self.selection.clear();
        self.elapsed_secs = 0;
    }

    /// Replaces the theme catalog. A previously chosen theme is kept if
    /// still available; otherwise the fallback rule re-applies.
    pub(crate) fn set_themes(&mut self, themes: Vec<Theme>) {
        let keep = self
            .active_theme
            .as_ref()
            .is_some_and(|active| themes.iter().any(|theme| theme.id() == active.id()));
        if !keep {
            self.active_theme = resolve_theme(self.puzzle.theme_id(), &themes);
        }
        self.themes = themes;
    }
}

/// Session phase, advanced exclusively by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the combined puzzle/progress/theme update.
    Loading {
        /// The puzzle id being loaded.
        puzzle_id: String,
    },
    /// Puzzle loaded, selections accepted, timer running.
    InProgress(ActiveGame),
    /// Every word found; selections ignored, timer stopped.
    Complete(ActiveGame),
    /// The puzzle could not be loaded. Terminal for this session
    /// instance; the only exit is a new session for another puzzle id.
    Error(GameError),
}

impl SessionPhase {
    /// Creates the initial phase for a session on `puzzle_id`.
    pub fn new(puzzle_id: impl Into<String>) -> Self {
        Self::Loading {
            puzzle_id: puzzle_id.into(),
        }
    }

    /// Whether the session is still waiting for data.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether the timer should be running.
    pub fn is_ticking(&self) -> bool {
        matches!(self, Self::InProgress(_))
    }

    /// Whether the puzzle has been completed.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// The active game state, if the puzzle has loaded.
    pub fn game(&self) -> Option<&ActiveGame> {
        match self {
            Self::InProgress(game) | Self::Complete(game) => Some(game),
            _ => None,
        }
    }

    /// Produces the observable snapshot for this phase.
    pub fn snapshot(&self) -> GameSnapshot {
        match self {
            Self::Loading { .. } => GameSnapshot {
                puzzle: None,
                selection: Vec::new(),
                found_words: BTreeSet::new(),
                elapsed_secs: 0,
                score: 0,
                is_loading: true,
                is_complete: false,
                error: None,
                themes: Vec::new(),
                active_theme: None,
            },
            Self::InProgress(game) | Self::Complete(game) => GameSnapshot {
                puzzle: Some(game.puzzle.clone()),
                selection: game.selection.cells().to_vec(),
                found_words: game.found.clone(),
                elapsed_secs: game.elapsed_secs,
                score: game.score(),
                is_loading: false,
                is_complete: self.is_complete(),
                error: None,
                themes: game.themes.clone(),
                active_theme: game.active_theme.clone(),
            },
            Self::Error(error) => GameSnapshot {
                puzzle: None,
                selection: Vec::new(),
                found_words: BTreeSet::new(),
                elapsed_secs: 0,
                score: 0,
                is_loading: false,
                is_complete: false,
                error: Some(error.to_string()),
                themes: Vec::new(),
                active_theme: None,
            },
        }
    }
}

/// Immutable view of the session published after every event.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameSnapshot {
    puzzle: Option<Puzzle>,
    selection: Vec<Position>,
    found_words: BTreeSet<String>,
    elapsed_secs: u64,
    score: u32,
    is_loading: bool,
    is_complete: bool,
    error: Option<String>,
    themes: Vec<Theme>,
    active_theme: Option<Theme>,
}
