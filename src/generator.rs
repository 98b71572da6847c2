//! Sample puzzle generation.
//!
//! This is deliberately not a real puzzle-generation engine: words are
//! laid out horizontally on spread rows with no collision handling and no
//! solvability proof, and two words assigned the same row clobber each
//! other. It exists to produce sample and test content.

use crate::error::GameError;
use crate::game::{Difficulty, GameMode, Grid, Position, Puzzle, Word};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Placeholder cell value before random fill.
const PLACEHOLDER: char = 'A';

/// Alphabet used to fill cells no word occupies. `'A'` is excluded so
/// placeholder cells are distinguishable during placement; `'A'`s written
/// by placed words survive as word letters.
const FILL_LETTERS: &[char] = &[
    'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Lays `words` horizontally into a `size × size` grid and fills the rest
/// with random letters.
///
/// Word `i` starts at column 0 of row `(2·i) mod (size − 1)`; words longer
/// than `size` are skipped. Returns the grid and, per word, the placed
/// span (`None` for skipped words).
///
/// # Errors
///
/// Returns [`GameError::MalformedGrid`] if `size < 2`.
pub fn generate_grid(
    words: &[&str],
    size: usize,
    rng: &mut impl Rng,
) -> Result<(Grid, Vec<Option<(Position, Position)>>), GameError> {
    if size < 2 {
        return Err(GameError::malformed_grid(format!(
            "generated grid needs size >= 2, got {}",
            size
        )));
    }
    let mut cells = vec![vec![PLACEHOLDER; size]; size];
    let mut spans = Vec::with_capacity(words.len());

    for (index, word) in words.iter().enumerate() {
        let letters: Vec<char> = word.to_uppercase().chars().collect();
        if letters.len() > size || letters.is_empty() {
            debug!(%word, size, "word does not fit generated grid, skipping");
            spans.push(None);
            continue;
        }
        let row = (index * 2) % (size - 1);
        for (col, letter) in letters.iter().enumerate() {
            cells[row][col] = *letter;
        }
        spans.push(Some((
            Position::new(row as i32, 0),
            Position::new(row as i32, letters.len() as i32 - 1),
        )));
    }

    for row in &mut cells {
        for cell in row.iter_mut() {
            if *cell == PLACEHOLDER {
                *cell = FILL_LETTERS[rng.gen_range(0..FILL_LETTERS.len())];
            }
        }
    }

    let grid = Grid::from_rows(cells)?;
    Ok((grid, spans))
}

/// Generates a puzzle from `(word, definition)` entries with a seeded
/// fill, so the same seed always yields the same grid.
///
/// # Errors
///
/// Returns [`GameError::MalformedGrid`] if `size < 2`.
pub fn generate_puzzle(
    id: impl Into<String>,
    theme_id: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
    entries: &[(&str, &str)],
    size: usize,
    date: NaiveDate,
    seed: u64,
) -> Result<Puzzle, GameError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let texts: Vec<&str> = entries.iter().map(|(word, _)| *word).collect();
    let (grid, spans) = generate_grid(&texts, size, &mut rng)?;

    let words = entries
        .iter()
        .zip(spans)
        .map(|(&(text, definition), span)| {
            let word = Word::new(text).with_definition(definition);
            match span {
                Some((start, end)) => word.with_span(start, end),
                None => word,
            }
        })
        .collect();

    Ok(Puzzle::new(id, theme_id, title, description, words, grid, date))
}

/// The built-in sample puzzle ("Tech Words").
pub fn sample_puzzle(date: NaiveDate) -> Puzzle {
    generate_puzzle(
        "sample-puzzle",
        "starlight_realm",
        "Tech Words",
        "Find technology-related words in this puzzle",
        &[
            ("CODE", "Programming instructions"),
            ("DATA", "Information stored digitally"),
            ("APP", "Software application"),
            ("WEB", "Internet"),
        ],
        10,
        date,
        0xC0DE,
    )
    .expect("sample puzzle parameters are valid")
    .with_difficulty(Difficulty::Easy)
    .with_flavor(
        "Technology shapes our daily lives in countless ways.",
        "Welcome to the world of mobile development!",
    )
}

/// The built-in daily sample puzzle ("Nature's Beauty") for `date`.
///
/// Uses a fixed hand-laid grid rather than the generator; its id follows
/// the `daily-YYYY-MM-DD` convention the daily lookup expects.
pub fn daily_sample_puzzle(date: NaiveDate) -> Puzzle {
    let grid: Grid = "N,A,T,U,R,E,F,O,R,E;\
                      S,X,P,O,A,A,O,A,A,S;\
                      M,O,A,R,A,A,R,A,A,T;\
                      O,U,A,E,A,A,E,A,A,A;\
                      U,N,T,A,I,N,S,A,A,A;\
                      N,T,A,T,A,A,T,A,A,A;\
                      T,A,A,A,A,A,A,A,A,A;\
                      A,I,W,I,L,D,L,I,F,E;\
                      I,N,A,A,A,A,A,A,A,A;\
                      N,R,I,V,E,R,A,A,A,A"
        .parse()
        .expect("built-in daily grid is well-formed");

    let words = vec![
        Word::new("NATURE").with_definition("The natural world around us"),
        Word::new("FOREST").with_definition("Large area covered with trees"),
        Word::new("RIVER").with_definition("Natural flowing watercourse"),
        Word::new("MOUNTAIN")
            .with_definition("Large landform that rises above surrounding land"),
        Word::new("WILDLIFE").with_definition("Animals living in their natural habitat"),
    ];

    Puzzle::new(
        format!("daily-{}", date),
        "everdawn",
        "Nature's Beauty",
        "Explore the wonders of nature in today's puzzle",
        words,
        grid,
        date,
    )
    .with_mode(GameMode::Mirror)
    .with_flavor(
        "Nature provides endless inspiration and tranquility.",
        "Take a moment to appreciate the natural world around you.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_words_placed_horizontally() {
        let mut rng = StdRng::seed_from_u64(7);
        let (grid, spans) = generate_grid(&["CODE", "DATA"], 10, &mut rng).unwrap();

        let row0: String = (0..4)
            .map(|col| grid.get(Position::new(0, col)).unwrap())
            .collect();
        assert_eq!(row0, "CODE");
        let row2: String = (0..4)
            .map(|col| grid.get(Position::new(2, col)).unwrap())
            .collect();
        assert_eq!(row2, "DATA");

        assert_eq!(
            spans[0],
            Some((Position::new(0, 0), Position::new(0, 3)))
        );
        assert_eq!(
            spans[1],
            Some((Position::new(2, 0), Position::new(2, 3)))
        );
    }

    #[test]
    fn test_oversized_word_skipped() {
        let mut rng = StdRng::seed_from_u64(7);
        let (_, spans) = generate_grid(&["EXTRAORDINARY"], 10, &mut rng).unwrap();
        assert_eq!(spans, vec![None]);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = generate_puzzle("p", "t", "T", "D", &[("WEB", "net")], 10, date(), 42).unwrap();
        let b = generate_puzzle("p", "t", "T", "D", &[("WEB", "net")], 10, date(), 42).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_tiny_size_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_grid(&["HI"], 1, &mut rng).is_err());
    }

    #[test]
    fn test_daily_sample_contains_its_words() {
        let puzzle = daily_sample_puzzle(date());
        assert_eq!(puzzle.id(), "daily-2025-01-01");
        assert_eq!(puzzle.word_count(), 5);
        assert_eq!(puzzle.grid().height(), 10);

        // RIVER sits on the bottom row of the hand-laid grid.
        let river: String = (1..6)
            .map(|col| puzzle.grid().get(Position::new(9, col)).unwrap())
            .collect();
        assert_eq!(river, "RIVER");
    }
}
