//! Collaborator interfaces and the in-memory reference store.
//!
//! The session consumes three abstract collaborators (puzzle source,
//! progress store, streak tracker) plus the theme catalog. All reads are
//! live-updating streams: subscribe once, receive the current value and
//! every later change. [`MemoryGameStore`] implements the whole set over
//! watch channels and is the store used by tests and demos; a real
//! persistence backend would implement the same traits.

mod records;

pub use records::{ProgressRecord, PuzzleRecord};

use crate::error::StoreError;
use crate::game::{Puzzle, PuzzleProgress};
use crate::generator::{daily_sample_puzzle, sample_puzzle};
use crate::stats::PlayerStats;
use crate::theme::{Theme, available_themes, default_themes};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Prefix routing a puzzle id to the daily-puzzle lookup.
pub const DAILY_PREFIX: &str = "daily-";

/// The id the daily puzzle for `date` is stored under.
pub fn daily_id(date: NaiveDate) -> String {
    format!("{}{}", DAILY_PREFIX, date)
}

/// Live-updating source of puzzles.
pub trait PuzzleSource: Send + Sync {
    /// Subscribes to the puzzle with the given id.
    fn puzzle_by_id(&self, id: &str) -> watch::Receiver<Option<Puzzle>>;

    /// Subscribes to the daily puzzle for the given date.
    fn daily_puzzle(&self, date: NaiveDate) -> watch::Receiver<Option<Puzzle>>;
}

/// Progress reads and fire-and-forget saves.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Subscribes to the progress record for a puzzle.
    fn progress(&self, puzzle_id: &str) -> watch::Receiver<Option<PuzzleProgress>>;

    /// Persists `progress`, replacing any prior record for its puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be written. Callers in
    /// the session path log and continue; in-memory state is never rolled
    /// back.
    async fn save_progress(&self, progress: PuzzleProgress) -> Result<(), StoreError>;
}

/// Maintains the player's daily completion streak.
#[async_trait]
pub trait StreakTracker: Send + Sync {
    /// Records that a puzzle was completed today. Invoked exactly once
    /// per puzzle completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the update cannot be written.
    async fn record_daily_completion(&self) -> Result<(), StoreError>;
}

/// Live-updating catalog of themes the player may use.
pub trait ThemeCatalog: Send + Sync {
    /// Subscribes to the available-theme list.
    fn available_themes(&self) -> watch::Receiver<Vec<Theme>>;
}

/// The collaborator handles a session consumes.
#[derive(Clone)]
pub struct Collaborators {
    /// Puzzle source.
    pub puzzles: Arc<dyn PuzzleSource>,
    /// Progress store.
    pub progress: Arc<dyn ProgressStore>,
    /// Streak tracker.
    pub streaks: Arc<dyn StreakTracker>,
    /// Theme catalog.
    pub themes: Arc<dyn ThemeCatalog>,
}

type SenderMap<T> = Mutex<HashMap<String, watch::Sender<Option<T>>>>;

/// In-memory store implementing every collaborator interface.
///
/// Cheap to clone; clones share state. Rows are kept as
/// [`PuzzleRecord`]/[`ProgressRecord`] and decoded on the way out,
/// mirroring how a relational backend would hold them; subscribers see
/// domain values through watch channels.
#[derive(Clone)]
pub struct MemoryGameStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    puzzle_rows: Mutex<HashMap<String, PuzzleRecord>>,
    puzzle_streams: SenderMap<Puzzle>,
    progress_rows: Mutex<HashMap<String, ProgressRecord>>,
    progress_streams: SenderMap<PuzzleProgress>,
    catalog: Vec<Theme>,
    unlocked: Mutex<BTreeSet<String>>,
    theme_stream: watch::Sender<Vec<Theme>>,
    stats_stream: watch::Sender<PlayerStats>,
    save_counter: AtomicU64,
    today: Mutex<NaiveDate>,
}

impl MemoryGameStore {
    /// Creates an empty store; `today` anchors daily ids and streak
    /// updates.
    #[instrument]
    pub fn new(today: NaiveDate) -> Self {
        let catalog = default_themes();
        let initial = available_themes(&catalog, &BTreeSet::new());
        Self {
            inner: Arc::new(StoreInner {
                puzzle_rows: Mutex::new(HashMap::new()),
                puzzle_streams: Mutex::new(HashMap::new()),
                progress_rows: Mutex::new(HashMap::new()),
                progress_streams: Mutex::new(HashMap::new()),
                catalog,
                unlocked: Mutex::new(BTreeSet::new()),
                theme_stream: watch::channel(initial).0,
                stats_stream: watch::channel(PlayerStats::new()).0,
                save_counter: AtomicU64::new(0),
                today: Mutex::new(today),
            }),
        }
    }

    /// Creates a store seeded with the built-in sample puzzle and the
    /// daily puzzle for `today`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a seed puzzle fails to round-trip
    /// through its stored row.
    pub fn with_sample_puzzles(today: NaiveDate) -> Result<Self, StoreError> {
        let store = Self::new(today);
        store.insert_puzzle(&sample_puzzle(today))?;
        store.insert_puzzle(&daily_sample_puzzle(today))?;
        Ok(store)
    }

    /// Stores a puzzle and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the encoded row fails to decode: a
    /// puzzle that cannot round-trip through storage is rejected rather
    /// than published.
    #[instrument(skip(self, puzzle), fields(puzzle_id = %puzzle.id()))]
    pub fn insert_puzzle(&self, puzzle: &Puzzle) -> Result<(), StoreError> {
        self.insert_puzzle_row(PuzzleRecord::from_puzzle(puzzle))
    }

    /// Stores a raw puzzle row and notifies subscribers with the decoded
    /// puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the row fails to decode.
    pub fn insert_puzzle_row(&self, record: PuzzleRecord) -> Result<(), StoreError> {
        let puzzle = record.to_puzzle()?;
        let id = record.id().clone();
        self.inner
            .puzzle_rows
            .lock()
            .unwrap()
            .insert(id.clone(), record);
        publish(&self.inner.puzzle_streams, &id, Some(puzzle));
        info!(puzzle_id = %id, "Puzzle stored");
        Ok(())
    }

    /// Marks a premium theme unlocked and republishes the catalog.
    pub fn unlock_theme(&self, theme_id: impl Into<String>) {
        let filtered = {
            let mut unlocked = self.inner.unlocked.lock().unwrap();
            unlocked.insert(theme_id.into());
            available_themes(&self.inner.catalog, &unlocked)
        };
        self.inner.theme_stream.send_replace(filtered);
    }

    /// Applies persisted preferences: unlocks every premium theme the
    /// settings record as owned.
    pub fn apply_settings(&self, settings: &crate::settings::GameSettings) {
        for theme_id in settings.unlocked_themes() {
            self.unlock_theme(theme_id.clone());
        }
    }

    /// Subscribes to player statistics.
    pub fn player_stats(&self) -> watch::Receiver<PlayerStats> {
        self.inner.stats_stream.subscribe()
    }

    /// Advances the store's notion of the current date (day rollover).
    pub fn set_today(&self, date: NaiveDate) {
        *self.inner.today.lock().unwrap() = date;
    }

    /// The collaborator bundle backed by this store.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            puzzles: Arc::new(self.clone()),
            progress: Arc::new(self.clone()),
            streaks: Arc::new(self.clone()),
            themes: Arc::new(self.clone()),
        }
    }
}

impl PuzzleSource for MemoryGameStore {
    fn puzzle_by_id(&self, id: &str) -> watch::Receiver<Option<Puzzle>> {
        subscribe(&self.inner.puzzle_streams, id)
    }

    fn daily_puzzle(&self, date: NaiveDate) -> watch::Receiver<Option<Puzzle>> {
        subscribe(&self.inner.puzzle_streams, &daily_id(date))
    }
}

#[async_trait]
impl ProgressStore for MemoryGameStore {
    fn progress(&self, puzzle_id: &str) -> watch::Receiver<Option<PuzzleProgress>> {
        subscribe(&self.inner.progress_streams, puzzle_id)
    }

    #[instrument(skip(self, progress), fields(puzzle_id = %progress.puzzle_id()))]
    async fn save_progress(&self, progress: PuzzleProgress) -> Result<(), StoreError> {
        let save_number = self.inner.save_counter.fetch_add(1, Ordering::Relaxed);
        let row_id = format!("{}-{}", progress.puzzle_id(), save_number);
        let last_played = *self.inner.today.lock().unwrap();
        let record = ProgressRecord::from_progress(&progress, row_id, last_played);

        let puzzle_id = progress.puzzle_id().clone();
        let decoded = record.to_progress();
        self.inner
            .progress_rows
            .lock()
            .unwrap()
            .insert(puzzle_id.clone(), record);
        publish(&self.inner.progress_streams, &puzzle_id, Some(decoded));
        debug!(
            puzzle_id = %puzzle_id,
            completed = progress.completed(),
            score = progress.score(),
            "Progress saved"
        );
        Ok(())
    }
}

#[async_trait]
impl StreakTracker for MemoryGameStore {
    #[instrument(skip(self))]
    async fn record_daily_completion(&self) -> Result<(), StoreError> {
        let today = *self.inner.today.lock().unwrap();
        self.inner
            .stats_stream
            .send_modify(|stats| *stats = stats.record_completion(today));
        Ok(())
    }
}

impl ThemeCatalog for MemoryGameStore {
    fn available_themes(&self) -> watch::Receiver<Vec<Theme>> {
        self.inner.theme_stream.subscribe()
    }
}

fn subscribe<T: Clone>(map: &SenderMap<T>, key: &str) -> watch::Receiver<Option<T>> {
    let mut map = map.lock().unwrap();
    map.entry(key.to_string())
        .or_insert_with(|| watch::channel(None).0)
        .subscribe()
}

fn publish<T: Clone>(map: &SenderMap<T>, key: &str, value: Option<T>) {
    let mut map = map.lock().unwrap();
    map.entry(key.to_string())
        .or_insert_with(|| watch::channel(None).0)
        .send_replace(value);
}
