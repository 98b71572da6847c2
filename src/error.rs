//! Error types for the game core.

use derive_more::{Display, Error};
use tracing::instrument;

/// Errors surfaced by the game core itself.
///
/// Persistence failures are deliberately absent: saves are fire-and-forget
/// and a failed save never alters in-memory session state (see
/// [`StoreError`] for the store-side type).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// The requested puzzle id resolved to no record. Terminal for the
    /// session instance.
    #[display("puzzle not found: {id}")]
    PuzzleNotFound {
        /// The id that failed to resolve.
        id: String,
    },
    /// A grid was constructed or parsed with rows of unequal length.
    #[display("malformed grid: {reason}")]
    MalformedGrid {
        /// Human-readable description of the defect.
        reason: String,
    },
}

impl GameError {
    /// Creates a `PuzzleNotFound` error for the given id.
    #[instrument]
    pub fn puzzle_not_found(id: impl Into<String> + std::fmt::Debug) -> Self {
        Self::PuzzleNotFound { id: id.into() }
    }

    /// Creates a `MalformedGrid` error with the given reason.
    pub fn malformed_grid(reason: impl Into<String>) -> Self {
        Self::MalformedGrid {
            reason: reason.into(),
        }
    }
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<GameError> for StoreError {
    #[track_caller]
    fn from(err: GameError) -> Self {
        Self::new(err.to_string())
    }
}

/// Settings error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("settings error: {} at {}:{}", message, file, line)]
pub struct SettingsError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl SettingsError {
    /// Creates a new settings error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
