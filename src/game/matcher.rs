//! Resolving a finished selection into a word-list match.

use super::selection::Selection;
use super::types::{Grid, Word};
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of matching a finished selection against the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The selection spells a listed word not yet found. Carries the
    /// canonical uppercase text.
    Found(String),
    /// The selection spells a listed word that is already in the found
    /// set; the find is not credited again.
    AlreadyFound(String),
    /// The selection spells nothing on the word list.
    NoMatch,
}

/// Reads the selected cells in selection order and concatenates their
/// letters, uppercased.
///
/// Returns `None` for an empty selection or a selection touching a cell
/// the grid does not contain; there is no candidate word in either case.
pub fn resolve_selection(selection: &Selection, grid: &Grid) -> Option<String> {
    if selection.is_empty() {
        return None;
    }
    let mut text = String::with_capacity(selection.len());
    for &cell in selection.cells() {
        let letter = grid.get(cell)?;
        text.extend(letter.to_uppercase());
    }
    Some(text)
}

/// Matches a finished selection against the puzzle's word list.
///
/// The resolved text is compared uppercased against the uppercased word
/// list; a listed word already present in `found` (case-insensitively) is
/// reported as [`MatchOutcome::AlreadyFound`] rather than credited twice.
///
/// Matching reads the cells strictly in selection order: a word selected
/// back-to-front produces its reversal, which matches only if the list
/// independently contains that reversed string. Total over its input
/// domain: never panics, never errors.
pub fn match_selection(
    selection: &Selection,
    grid: &Grid,
    words: &[Word],
    found: &BTreeSet<String>,
) -> MatchOutcome {
    let candidate = match resolve_selection(selection, grid) {
        Some(text) => text,
        None => return MatchOutcome::NoMatch,
    };

    let listed = words
        .iter()
        .any(|word| word.text().to_uppercase() == candidate);
    if !listed {
        debug!(%candidate, "selection resolved to an unlisted word");
        return MatchOutcome::NoMatch;
    }
    if found.contains(&candidate) {
        debug!(%candidate, "word already found");
        return MatchOutcome::AlreadyFound(candidate);
    }
    MatchOutcome::Found(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Position;

    fn cat_grid() -> Grid {
        Grid::from_rows(vec![vec!['C', 'A', 'T']]).unwrap()
    }

    fn select(grid: &Grid, cells: &[(i32, i32)]) -> Selection {
        let mut selection = Selection::new();
        for &(row, col) in cells {
            assert!(selection.try_extend(Position::new(row, col), grid));
        }
        selection
    }

    #[test]
    fn test_resolves_in_selection_order() {
        let grid = cat_grid();
        let forward = select(&grid, &[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(resolve_selection(&forward, &grid).as_deref(), Some("CAT"));

        let backward = select(&grid, &[(0, 2), (0, 1), (0, 0)]);
        assert_eq!(resolve_selection(&backward, &grid).as_deref(), Some("TAC"));
    }

    #[test]
    fn test_resolve_uppercases() {
        let grid = Grid::from_rows(vec![vec!['c', 'a', 't']]).unwrap();
        let selection = select(&grid, &[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(resolve_selection(&selection, &grid).as_deref(), Some("CAT"));
    }

    #[test]
    fn test_empty_selection_has_no_candidate() {
        let grid = cat_grid();
        assert_eq!(resolve_selection(&Selection::new(), &grid), None);
        assert_eq!(
            match_selection(&Selection::new(), &grid, &[Word::new("CAT")], &BTreeSet::new()),
            MatchOutcome::NoMatch
        );
    }

    #[test]
    fn test_match_found() {
        let grid = cat_grid();
        let selection = select(&grid, &[(0, 0), (0, 1), (0, 2)]);
        let outcome = match_selection(&selection, &grid, &[Word::new("cat")], &BTreeSet::new());
        assert_eq!(outcome, MatchOutcome::Found("CAT".to_string()));
    }

    #[test]
    fn test_match_rejects_duplicate_find() {
        let grid = cat_grid();
        let selection = select(&grid, &[(0, 0), (0, 1), (0, 2)]);
        let found: BTreeSet<String> = [String::from("CAT")].into();
        let outcome = match_selection(&selection, &grid, &[Word::new("CAT")], &found);
        assert_eq!(outcome, MatchOutcome::AlreadyFound("CAT".to_string()));
    }

    #[test]
    fn test_reversed_selection_is_not_a_find() {
        let grid = cat_grid();
        let backward = select(&grid, &[(0, 2), (0, 1), (0, 0)]);
        let outcome = match_selection(&backward, &grid, &[Word::new("CAT")], &BTreeSet::new());
        assert_eq!(outcome, MatchOutcome::NoMatch);

        // The reversal matches only when the list itself contains it.
        let words = [Word::new("CAT"), Word::new("TAC")];
        let outcome = match_selection(&backward, &grid, &words, &BTreeSet::new());
        assert_eq!(outcome, MatchOutcome::Found("TAC".to_string()));
    }
}
