//! Session events and side-effect commands.

use super::SessionPhase;
use crate::game::{Position, Puzzle, PuzzleProgress};
use crate::theme::Theme;

/// An input to the session reducer.
///
/// The first four variants form the public event surface; `Tick` and
/// `DataLoaded` are produced by the runtime (the timer and the combined
/// collaborator streams).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The player dragged over a cell.
    CellSelected(Position),
    /// The player lifted the drag; the selection is finalized.
    SelectionEnded,
    /// The player picked a theme by id.
    ThemeChanged(String),
    /// Restart the current puzzle from scratch.
    ResetGame,
    /// One tick-interval of play time elapsed.
    Tick,
    /// Combined update from the puzzle, progress, and theme streams.
    /// Always applied as one event so the session never observes a
    /// partially updated view (a new puzzle with stale progress).
    DataLoaded {
        /// Current puzzle stream value.
        puzzle: Option<Puzzle>,
        /// Current progress stream value.
        progress: Option<PuzzleProgress>,
        /// Current theme catalog.
        themes: Vec<Theme>,
    },
}

/// A side effect requested by the reducer, interpreted by the runtime.
///
/// Both are fire-and-forget: a failure is logged and never alters
/// in-memory session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Persist the given progress, replacing any prior record.
    SaveProgress(PuzzleProgress),
    /// Tell the streak collaborator a puzzle was completed today.
    /// Emitted exactly once per completion.
    RecordDailyCompletion,
}

/// Result of one reducer application: the next phase plus the commands
/// to run.
#[derive(Debug)]
pub struct Step {
    /// The next session phase.
    pub phase: SessionPhase,
    /// Side effects to run, in order.
    pub commands: Vec<Command>,
}

impl Step {
    /// A step with no side effects.
    pub fn keep(phase: SessionPhase) -> Self {
        Self {
            phase,
            commands: Vec::new(),
        }
    }

    /// A step with side effects.
    pub fn with_commands(phase: SessionPhase, commands: Vec<Command>) -> Self {
        Self { phase, commands }
    }
}
