//! The session transition table.

use super::event::{Command, SessionEvent, Step};
use super::{ActiveGame, SessionPhase};
use crate::error::GameError;
use crate::game::{MatchOutcome, Puzzle, PuzzleProgress, match_selection};
use crate::theme::Theme;
use tracing::{debug, info, warn};

/// Applies one event to the session, returning the next phase and the
/// side-effect commands to run.
///
/// Pure: same phase and event always yield the same step. Total: every
/// `(phase, event)` pair is handled; events that do not apply to the
/// current phase leave it unchanged.
pub fn reduce(phase: SessionPhase, event: SessionEvent) -> Step {
    match phase {
        SessionPhase::Loading { puzzle_id } => match event {
            SessionEvent::DataLoaded {
                puzzle,
                progress,
                themes,
            } => on_data_loaded(puzzle_id, puzzle, progress, themes),
            // Input arriving before the puzzle exists has nothing to act on.
            _ => Step::keep(SessionPhase::Loading { puzzle_id }),
        },
        SessionPhase::InProgress(game) => on_in_progress(game, event),
        SessionPhase::Complete(game) => on_complete(game, event),
        // Terminal: only a new session instance leaves this phase.
        SessionPhase::Error(error) => Step::keep(SessionPhase::Error(error)),
    }
}

fn on_data_loaded(
    puzzle_id: String,
    puzzle: Option<Puzzle>,
    progress: Option<PuzzleProgress>,
    themes: Vec<Theme>,
) -> Step {
    let Some(puzzle) = puzzle else {
        warn!(puzzle_id = %puzzle_id, "puzzle stream yielded nothing");
        return Step::keep(SessionPhase::Error(GameError::puzzle_not_found(puzzle_id)));
    };

    let found = progress
        .as_ref()
        .map(PuzzleProgress::found_texts)
        .unwrap_or_default();
    let elapsed_secs = progress.as_ref().map(|p| *p.time_spent()).unwrap_or(0);
    let already_completed = progress.as_ref().map(|p| *p.completed()).unwrap_or(false);

    let game = ActiveGame::new(puzzle, found, elapsed_secs, themes);
    info!(
        puzzle = %game.puzzle.id(),
        found = game.found.len(),
        elapsed_secs,
        "Puzzle loaded"
    );

    // A session restored as complete stays complete: the timer never
    // starts and no save or streak update is re-issued.
    if already_completed || game.is_complete() {
        Step::keep(SessionPhase::Complete(game))
    } else {
        Step::keep(SessionPhase::InProgress(game))
    }
}

fn on_in_progress(mut game: ActiveGame, event: SessionEvent) -> Step {
    match event {
        SessionEvent::CellSelected(position) => {
            game.selection.try_extend(position, game.puzzle.grid());
            Step::keep(SessionPhase::InProgress(game))
        }
        SessionEvent::SelectionEnded => on_selection_ended(game),
        SessionEvent::Tick => {
            game.elapsed_secs += 1;
            Step::keep(SessionPhase::InProgress(game))
        }
        SessionEvent::ThemeChanged(theme_id) => {
            change_theme(&mut game, &theme_id);
            Step::keep(SessionPhase::InProgress(game))
        }
        SessionEvent::ResetGame => {
            game.reset();
            Step::keep(SessionPhase::InProgress(game))
        }
        SessionEvent::DataLoaded { themes, .. } => {
            // After load, in-memory game state is authoritative; later
            // emissions only refresh the theme catalog.
            game.set_themes(themes);
            Step::keep(SessionPhase::InProgress(game))
        }
    }
}

fn on_selection_ended(mut game: ActiveGame) -> Step {
    let outcome = match_selection(
        &game.selection,
        game.puzzle.grid(),
        game.puzzle.words(),
        &game.found,
    );
    game.selection.clear();

    match outcome {
        MatchOutcome::Found(word) => {
            game.found.insert(word.clone());
            let progress = game.to_progress();
            if game.is_complete() {
                info!(word = %word, score = game.score(), "Final word found, puzzle complete");
                Step::with_commands(
                    SessionPhase::Complete(game),
                    vec![
                        Command::SaveProgress(progress),
                        Command::RecordDailyCompletion,
                    ],
                )
            } else {
                info!(word = %word, found = game.found.len(), "Word found");
                Step::with_commands(
                    SessionPhase::InProgress(game),
                    vec![Command::SaveProgress(progress)],
                )
            }
        }
        MatchOutcome::AlreadyFound(word) => {
            debug!(word = %word, "selection re-found a word, not credited");
            Step::keep(SessionPhase::InProgress(game))
        }
        MatchOutcome::NoMatch => Step::keep(SessionPhase::InProgress(game)),
    }
}

fn on_complete(mut game: ActiveGame, event: SessionEvent) -> Step {
    match event {
        SessionEvent::ResetGame => {
            info!(puzzle = %game.puzzle.id(), "Session reset");
            game.reset();
            Step::keep(SessionPhase::InProgress(game))
        }
        SessionEvent::ThemeChanged(theme_id) => {
            change_theme(&mut game, &theme_id);
            Step::keep(SessionPhase::Complete(game))
        }
        SessionEvent::DataLoaded { themes, .. } => {
            game.set_themes(themes);
            Step::keep(SessionPhase::Complete(game))
        }
        // Selection events and ticks are ignored once complete.
        _ => Step::keep(SessionPhase::Complete(game)),
    }
}

fn change_theme(game: &mut ActiveGame, theme_id: &str) {
    match game.themes.iter().find(|theme| theme.id() == theme_id) {
        Some(theme) => game.active_theme = Some(theme.clone()),
        None => debug!(theme_id, "theme not in catalog, ignoring change"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Grid, Position, Word};
    use crate::theme::default_themes;
    use chrono::NaiveDate;

    fn cat_puzzle() -> Puzzle {
        Puzzle::new(
            "cat-1",
            "starlight_realm",
            "Cats",
            "One word",
            vec![Word::new("CAT")],
            Grid::from_rows(vec![vec!['C', 'A', 'T']]).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        )
    }

    fn loaded(puzzle: Puzzle, progress: Option<PuzzleProgress>) -> SessionPhase {
        reduce(
            SessionPhase::new(puzzle.id().clone()),
            SessionEvent::DataLoaded {
                puzzle: Some(puzzle),
                progress,
                themes: default_themes(),
            },
        )
        .phase
    }

    fn drag(mut phase: SessionPhase, cells: &[(i32, i32)]) -> SessionPhase {
        for &(row, col) in cells {
            phase = reduce(phase, SessionEvent::CellSelected(Position::new(row, col))).phase;
        }
        phase
    }

    #[test]
    fn test_load_enters_in_progress() {
        let phase = loaded(cat_puzzle(), None);
        assert!(phase.is_ticking());
        let game = phase.game().unwrap();
        assert!(game.found().is_empty());
        assert_eq!(game.active_theme.as_ref().unwrap().id(), "starlight_realm");
    }

    #[test]
    fn test_missing_puzzle_enters_error() {
        let step = reduce(
            SessionPhase::new("gone"),
            SessionEvent::DataLoaded {
                puzzle: None,
                progress: None,
                themes: Vec::new(),
            },
        );
        assert!(matches!(
            step.phase,
            SessionPhase::Error(GameError::PuzzleNotFound { .. })
        ));
        assert!(step.commands.is_empty());

        // Terminal: further events change nothing.
        let phase = reduce(step.phase, SessionEvent::SelectionEnded).phase;
        assert!(matches!(phase, SessionPhase::Error(_)));
    }

    #[test]
    fn test_completed_progress_loads_complete_without_commands() {
        let progress = PuzzleProgress::new(
            "cat-1".to_string(),
            vec![Word::new("CAT")],
            40,
            true,
            1060,
        );
        let step = reduce(
            SessionPhase::new("cat-1"),
            SessionEvent::DataLoaded {
                puzzle: Some(cat_puzzle()),
                progress: Some(progress),
                themes: default_themes(),
            },
        );
        assert!(step.phase.is_complete());
        assert!(!step.phase.is_ticking());
        assert!(step.commands.is_empty());
    }

    #[test]
    fn test_empty_word_list_completes_at_load() {
        let puzzle = Puzzle::new(
            "empty",
            "starlight_realm",
            "Empty",
            "",
            Vec::new(),
            Grid::from_rows(vec![vec!['X']]).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        );
        let step = reduce(
            SessionPhase::new("empty"),
            SessionEvent::DataLoaded {
                puzzle: Some(puzzle),
                progress: None,
                themes: Vec::new(),
            },
        );
        assert!(step.phase.is_complete());
        assert!(step.commands.is_empty());
    }

    #[test]
    fn test_find_saves_and_completes() {
        let phase = loaded(cat_puzzle(), None);
        let phase = drag(phase, &[(0, 0), (0, 1), (0, 2)]);
        let step = reduce(phase, SessionEvent::SelectionEnded);

        assert!(step.phase.is_complete());
        assert_eq!(step.commands.len(), 2);
        match &step.commands[0] {
            Command::SaveProgress(progress) => {
                assert!(*progress.completed());
                assert_eq!(*progress.score(), 1100);
                assert!(progress.found_texts().contains("CAT"));
            }
            other => panic!("expected SaveProgress, got {:?}", other),
        }
        assert_eq!(step.commands[1], Command::RecordDailyCompletion);

        // Selection cleared on completion.
        assert!(step.phase.game().unwrap().selection().is_empty());
    }

    #[test]
    fn test_no_match_clears_selection_without_commands() {
        let phase = loaded(cat_puzzle(), None);
        let phase = drag(phase, &[(0, 2), (0, 1)]);
        let step = reduce(phase, SessionEvent::SelectionEnded);

        assert!(step.phase.is_ticking());
        assert!(step.commands.is_empty());
        assert!(step.phase.game().unwrap().selection().is_empty());
    }

    #[test]
    fn test_tick_advances_only_in_progress() {
        let phase = loaded(cat_puzzle(), None);
        let phase = reduce(phase, SessionEvent::Tick).phase;
        let phase = reduce(phase, SessionEvent::Tick).phase;
        assert_eq!(phase.game().unwrap().elapsed_secs(), 2);

        let phase = drag(phase, &[(0, 0), (0, 1), (0, 2)]);
        let phase = reduce(phase, SessionEvent::SelectionEnded).phase;
        assert!(phase.is_complete());

        let phase = reduce(phase, SessionEvent::Tick).phase;
        assert_eq!(phase.game().unwrap().elapsed_secs(), 2);
    }

    #[test]
    fn test_complete_ignores_selection_events() {
        let phase = loaded(cat_puzzle(), None);
        let phase = drag(phase, &[(0, 0), (0, 1), (0, 2)]);
        let phase = reduce(phase, SessionEvent::SelectionEnded).phase;

        let step = reduce(phase, SessionEvent::CellSelected(Position::new(0, 0)));
        assert!(step.phase.is_complete());
        assert!(step.phase.game().unwrap().selection().is_empty());
        assert!(step.commands.is_empty());
    }

    #[test]
    fn test_reset_returns_to_fresh_in_progress() {
        let phase = loaded(cat_puzzle(), None);
        let phase = reduce(phase, SessionEvent::Tick).phase;
        let phase = drag(phase, &[(0, 0), (0, 1), (0, 2)]);
        let phase = reduce(phase, SessionEvent::SelectionEnded).phase;
        assert!(phase.is_complete());

        let step = reduce(phase, SessionEvent::ResetGame);
        assert!(step.phase.is_ticking());
        assert!(step.commands.is_empty());
        let game = step.phase.game().unwrap();
        assert!(game.found().is_empty());
        assert_eq!(game.elapsed_secs(), 0);
    }

    #[test]
    fn test_theme_change_requires_catalog_membership() {
        let phase = loaded(cat_puzzle(), None);
        let phase = reduce(phase, SessionEvent::ThemeChanged("everdawn".to_string())).phase;
        assert_eq!(
            phase.game().unwrap().active_theme.as_ref().unwrap().id(),
            "everdawn"
        );

        let phase = reduce(phase, SessionEvent::ThemeChanged("nope".to_string())).phase;
        assert_eq!(
            phase.game().unwrap().active_theme.as_ref().unwrap().id(),
            "everdawn"
        );
    }

    #[test]
    fn test_late_data_only_refreshes_themes() {
        let phase = loaded(cat_puzzle(), None);
        let phase = drag(phase, &[(0, 0)]);

        let stale_progress = PuzzleProgress::new(
            "cat-1".to_string(),
            vec![Word::new("CAT")],
            500,
            true,
            1000,
        );
        let replacement = cat_puzzle().with_flavor("changed", "changed");
        let phase = reduce(
            phase,
            SessionEvent::DataLoaded {
                puzzle: Some(replacement),
                progress: Some(stale_progress),
                themes: Vec::new(),
            },
        )
        .phase;

        let game = phase.game().unwrap();
        assert!(phase.is_ticking());
        assert!(game.found().is_empty());
        assert_eq!(game.selection().len(), 1);
        assert!(game.puzzle().insight().is_empty());
        assert!(game.themes.is_empty());
    }
}
