//! Word-search puzzle engine.
//!
//! The core of a casual word-search game: a letter [`Grid`](game::Grid)
//! with a hidden word list, the straight-line drag-selection rule, word
//! matching, and a session state machine that tracks progress, score,
//! and completion. Presentation, audio, and storage backends are the
//! embedder's business; the engine talks to them through the
//! collaborator traits in [`store`].
//!
//! # Architecture
//!
//! - **game**: grid/puzzle data model, selection validation, matching,
//!   and scoring, all pure.
//! - **session**: explicit `Loading → InProgress → Complete` phases with
//!   an `Error` absorbing state, advanced by a pure reducer that emits
//!   side-effect commands.
//! - **runtime**: one tokio task per session owning the event queue, the
//!   play timer, and the combine-latest merge of the collaborator
//!   streams.
//! - **store**: collaborator traits plus an in-memory reference
//!   implementation.
//!
//! # Example
//!
//! ```no_run
//! use gridseek::{MemoryGameStore, SessionConfig, SessionEvent, spawn_session};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let today = chrono::Local::now().date_naive();
//! let store = MemoryGameStore::with_sample_puzzles(today)?;
//! let session = spawn_session(
//!     "sample-puzzle",
//!     store.collaborators(),
//!     SessionConfig::new(today),
//! );
//!
//! let mut snapshots = session.watch();
//! snapshots.wait_for(|snapshot| !snapshot.is_loading()).await?;
//! session.send(SessionEvent::SelectionEnded).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod game;
pub mod generator;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;
pub mod theme;

pub use error::{GameError, SettingsError, StoreError};
pub use game::{
    Difficulty, GameMode, Grid, MatchOutcome, Position, Puzzle, PuzzleProgress, Selection, Word,
};
pub use runtime::{SessionConfig, SessionHandle, spawn_session};
pub use session::{Command, GameSnapshot, SessionEvent, SessionPhase, Step, reduce};
pub use settings::GameSettings;
pub use stats::PlayerStats;
pub use store::{
    Collaborators, MemoryGameStore, ProgressStore, PuzzleSource, StreakTracker, ThemeCatalog,
};
pub use theme::{Theme, default_themes, resolve_theme};
