//! Async session driver.
//!
//! One tokio task per session owns all mutation: player events arrive on
//! an mpsc queue, the timer is a gated interval, and the three
//! collaborator streams are merged combine-latest style: any change
//! re-reads all three current values and applies them as a single
//! [`SessionEvent::DataLoaded`], so the session never observes a
//! partially updated view. Every applied event publishes a fresh
//! [`GameSnapshot`] on a watch channel.

use crate::session::{Command, GameSnapshot, SessionEvent, SessionPhase, reduce};
use crate::store::{Collaborators, DAILY_PREFIX, PuzzleSource};
use crate::game::{Puzzle, PuzzleProgress};
use crate::theme::Theme;
use chrono::NaiveDate;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Runtime configuration for a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Interval between timer ticks; elapsed time advances by one second
    /// of play per tick.
    pub tick_interval: Duration,
    /// The date used to resolve `daily-` puzzle ids.
    pub date: NaiveDate,
}

impl SessionConfig {
    /// One-second ticks with the given date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            date,
        }
    }

    /// Overrides the tick interval (tests use short intervals).
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

/// Handle to a running session.
///
/// Dropping the handle aborts the driver task, which cancels the tick
/// source immediately; tearing down a session never leaks periodic
/// work.
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
    snapshots: watch::Receiver<GameSnapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Sends a player event to the session. Events are applied in send
    /// order. A send after shutdown is logged and dropped.
    pub async fn send(&self, event: SessionEvent) {
        if self.events.send(event).await.is_err() {
            warn!("session task is gone, event dropped");
        }
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to snapshot updates.
    pub fn watch(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Tears the session down, cancelling the tick source immediately.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the driver task for a session on `puzzle_id`.
///
/// Ids with the `daily-` prefix route to the daily-puzzle lookup for the
/// configured date; everything else routes to lookup by id.
#[instrument(skip_all, fields(puzzle_id = %puzzle_id.as_ref()))]
pub fn spawn_session(
    puzzle_id: impl AsRef<str>,
    deps: Collaborators,
    config: SessionConfig,
) -> SessionHandle {
    let puzzle_id = puzzle_id.as_ref().to_string();
    let (event_tx, event_rx) = mpsc::channel(64);
    let phase = SessionPhase::new(puzzle_id.clone());
    let (snapshot_tx, snapshot_rx) = watch::channel(phase.snapshot());

    info!("Starting session");
    let task = tokio::spawn(drive(puzzle_id, deps, config, phase, event_rx, snapshot_tx));

    SessionHandle {
        events: event_tx,
        snapshots: snapshot_rx,
        task,
    }
}

async fn drive(
    puzzle_id: String,
    deps: Collaborators,
    config: SessionConfig,
    mut phase: SessionPhase,
    mut event_rx: mpsc::Receiver<SessionEvent>,
    snapshot_tx: watch::Sender<GameSnapshot>,
) {
    let mut puzzle_rx = subscribe_puzzle(&*deps.puzzles, &puzzle_id, config.date);
    let mut progress_rx = deps.progress.progress(&puzzle_id);
    let mut themes_rx = deps.themes.available_themes();

    let mut tick = tokio::time::interval(config.tick_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The three streams below are only polled while live; a dead stream
    // is logged once and left alone.
    let mut puzzle_live = true;
    let mut progress_live = true;
    let mut themes_live = true;

    // Initial combined application of whatever the streams already hold.
    phase = apply(
        phase,
        combined(&mut puzzle_rx, &mut progress_rx, &mut themes_rx),
        &deps,
        &snapshot_tx,
    )
    .await;
    let mut ticking = phase.is_ticking();
    if ticking {
        tick.reset();
    }

    loop {
        let event = tokio::select! {
            _ = tick.tick(), if ticking => Some(SessionEvent::Tick),
            maybe = event_rx.recv() => match maybe {
                Some(event) => Some(event),
                // All handles dropped: the session is being torn down.
                None => break,
            },
            result = puzzle_rx.changed(), if puzzle_live => match result {
                Ok(()) => Some(combined(&mut puzzle_rx, &mut progress_rx, &mut themes_rx)),
                Err(_) => {
                    warn!("puzzle stream closed");
                    puzzle_live = false;
                    None
                }
            },
            result = progress_rx.changed(), if progress_live => match result {
                Ok(()) => Some(combined(&mut puzzle_rx, &mut progress_rx, &mut themes_rx)),
                Err(_) => {
                    warn!("progress stream closed");
                    progress_live = false;
                    None
                }
            },
            result = themes_rx.changed(), if themes_live => match result {
                Ok(()) => Some(combined(&mut puzzle_rx, &mut progress_rx, &mut themes_rx)),
                Err(_) => {
                    warn!("theme stream closed");
                    themes_live = false;
                    None
                }
            },
        };

        if let Some(event) = event {
            phase = apply(phase, event, &deps, &snapshot_tx).await;
            let now_ticking = phase.is_ticking();
            if now_ticking && !ticking {
                // Entering play (initial load or reset): the next tick is
                // one full interval away.
                tick.reset();
            }
            ticking = now_ticking;
        }
    }
    debug!(puzzle_id = %puzzle_id, "session driver stopped");
}

/// Applies one event through the reducer, runs its commands, and
/// publishes the resulting snapshot.
async fn apply(
    phase: SessionPhase,
    event: SessionEvent,
    deps: &Collaborators,
    snapshot_tx: &watch::Sender<GameSnapshot>,
) -> SessionPhase {
    let step = reduce(phase, event);
    for command in step.commands {
        run_command(command, deps).await;
    }
    snapshot_tx.send_replace(step.phase.snapshot());
    step.phase
}

/// Runs a side-effect command. Failures are logged and swallowed: saves
/// are fire-and-forget and in-memory state stays authoritative.
async fn run_command(command: Command, deps: &Collaborators) {
    match command {
        Command::SaveProgress(progress) => {
            if let Err(error) = deps.progress.save_progress(progress).await {
                warn!(%error, "progress save failed, session state kept");
            }
        }
        Command::RecordDailyCompletion => {
            if let Err(error) = deps.streaks.record_daily_completion().await {
                warn!(%error, "streak update failed");
            }
        }
    }
}

/// Reads the current value of all three input streams as one combined
/// event, marking them seen.
fn combined(
    puzzle_rx: &mut watch::Receiver<Option<Puzzle>>,
    progress_rx: &mut watch::Receiver<Option<PuzzleProgress>>,
    themes_rx: &mut watch::Receiver<Vec<Theme>>,
) -> SessionEvent {
    SessionEvent::DataLoaded {
        puzzle: puzzle_rx.borrow_and_update().clone(),
        progress: progress_rx.borrow_and_update().clone(),
        themes: themes_rx.borrow_and_update().clone(),
    }
}

fn subscribe_puzzle(
    source: &dyn PuzzleSource,
    puzzle_id: &str,
    date: NaiveDate,
) -> watch::Receiver<Option<Puzzle>> {
    if puzzle_id.starts_with(DAILY_PREFIX) {
        source.daily_puzzle(date)
    } else {
        source.puzzle_by_id(puzzle_id)
    }
}
