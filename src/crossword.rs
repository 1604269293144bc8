use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{dictionary::Dictionary, grid::Grid, placed_word::PlacedWord};

/// Error type for structurally invalid [crosswords](CrosswordData)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CrosswordError
{
    #[error("The grid is not {width}x{height}.")]
    BadDimensions { width: usize, height: usize },
    #[error("The word {0} does not fit inside the grid.")]
    WordOutOfBounds(String),
    #[error("The word {word} does not match the grid at ({row}, {col}).")]
    LetterMismatch { word: String, row: usize, col: usize },
    #[error("The word {0} is already in the crossword.")]
    WordAlreadyExists(String),
    #[error("Clue numbers are not assigned in reading order: {0}")]
    ClueNumbering(String),
}

/// Kind of puzzle a [crossword](CrosswordData) was generated as.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleType
{
    Crossword,
    Fillin,
}

/// # Represents a finished puzzle
///
/// The grid is trimmed, every [word](PlacedWord) has its clue number, and for every word each of
/// its letters is found in `grid` at the cell the word covers. Cells that are not part of any
/// word are None (black).
///
/// This is the shape handed to the external store and read back by the UI without changes.
#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosswordData
{
    pub grid: Vec<Vec<Option<char>>>,
    pub words: Vec<PlacedWord>,
    pub width: usize,
    pub height: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_playability: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle_type: Option<PuzzleType>,
}

impl CrosswordData
{
    /// The degenerate result: no grid and no words.
    pub fn empty(puzzle_type: PuzzleType) -> CrosswordData
    {
        CrosswordData { avg_playability: Some(0), puzzle_type: Some(puzzle_type), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool
    {
        self.words.is_empty()
    }

    /// Fraction of cells holding a letter.
    pub fn density(&self) -> f64
    {
        let area = self.width * self.height;
        if area == 0 { return 0.0; }
        self.grid.iter().flatten().filter(|c| c.is_some()).count() as f64 / area as f64
    }

    /// Checks every structural guarantee of a finished puzzle.
    ///
    /// # Errors
    ///
    /// [CrosswordError::BadDimensions] - `grid` is not `height` rows of `width` cells
    /// [CrosswordError::WordOutOfBounds] - a word leaves the grid
    /// [CrosswordError::LetterMismatch] - a word's letter differs from the grid cell it covers
    /// [CrosswordError::WordAlreadyExists] - a word appears twice
    /// [CrosswordError::ClueNumbering] - clue numbers are missing, not in reading order, or not contiguous
    pub fn validate(&self) -> Result<(), CrosswordError>
    {
        if self.grid.len() != self.height || self.grid.iter().any(|row| row.len() != self.width)
        {
            return Err(CrosswordError::BadDimensions { width: self.width, height: self.height });
        }

        let mut seen = HashSet::new();
        for word in &self.words
        {
            if !seen.insert(word.word.as_str())
            {
                return Err(CrosswordError::WordAlreadyExists(word.word.clone()));
            }
            for (r, c, letter) in word.cells()
            {
                if r >= self.height || c >= self.width
                {
                    return Err(CrosswordError::WordOutOfBounds(word.word.clone()));
                }
                if self.grid[r][c] != Some(char::from(letter))
                {
                    return Err(CrosswordError::LetterMismatch { word: word.word.clone(), row: r, col: c });
                }
            }
        }

        let mut numbers: BTreeMap<(usize, usize), u32> = BTreeMap::new();
        for word in &self.words
        {
            let number = word.clue_number.ok_or_else(|| CrosswordError::ClueNumbering(format!("{} has no number", word.word)))?;
            if let Some(&other) = numbers.get(&(word.row, word.col))
            {
                if other != number
                {
                    return Err(CrosswordError::ClueNumbering(format!("({}, {}) has numbers {} and {}", word.row, word.col, other, number)));
                }
            }
            numbers.insert((word.row, word.col), number);
        }
        // BTreeMap iterates starts in reading order
        for (expected, (start, &number)) in (1u32..).zip(numbers.iter())
        {
            if number != expected
            {
                return Err(CrosswordError::ClueNumbering(format!("({}, {}) is {} instead of {}", start.0, start.1, number, expected)));
            }
        }

        Ok(())
    }

    /// Plain text picture of the grid, `#` for black cells.
    ///
    /// ```
    /// # use crossword_engine::crossword::CrosswordData;
    /// let cw = CrosswordData { grid: vec![vec![Some('A'), None], vec![Some('T'), Some('O')]], width: 2, height: 2, ..Default::default() };
    /// assert_eq!(cw.render(), "A#\nTO");
    /// ```
    pub fn render(&self) -> String
    {
        self.grid
            .iter()
            .map(|row| row.iter().map(|c| c.unwrap_or('#')).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Numbers the words in reading order.
///
/// Every distinct start cell gets the next number when scanning rows top to bottom and cells left
/// to right, an across and a down word starting on the same cell share it. Words are reordered
/// by number, across first.
pub fn assign_clue_numbers(words: &mut [PlacedWord])
{
    let starts: BTreeMap<(usize, usize), u32> = words
        .iter()
        .map(|w| (w.row, w.col))
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .zip(1u32..)
        .collect();

    for word in words.iter_mut()
    {
        word.clue_number = starts.get(&(word.row, word.col)).copied();
    }
    words.sort_by_key(|w| (w.clue_number, w.direction));
}

/// Rounded mean playability of the words, 0 for no words.
pub fn average_playability(words: &[PlacedWord], dict: &Dictionary) -> u32
{
    if words.is_empty() { return 0; }

    let sum: u64 = words.iter().map(|w| dict.playability(&w.word) as u64).sum();
    (sum as f64 / words.len() as f64).round() as u32
}

/// Turns a working grid into a finished [crossword](CrosswordData).
///
/// Crops the grid to its bounding box, moves every word by the cropped offset, assigns clue
/// numbers and computes the average playability. An empty grid gives the empty crossword.
pub fn finalize(grid: &Grid, mut words: Vec<PlacedWord>, dict: &Dictionary, puzzle_type: PuzzleType) -> CrosswordData
{
    if grid.is_empty() || words.is_empty()
    {
        return CrosswordData::empty(puzzle_type);
    }

    let (trimmed, (row_offset, col_offset)) = grid.trim();
    for word in words.iter_mut()
    {
        word.row -= row_offset;
        word.col -= col_offset;
    }
    assign_clue_numbers(&mut words);

    CrosswordData
    {
        grid: trimmed.to_rows(),
        width: trimmed.width(),
        height: trimmed.height(),
        avg_playability: Some(average_playability(&words, dict)),
        puzzle_type: Some(puzzle_type),
        words,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{settings::DictionarySettings, word::{Direction, WordEntry}};

    fn placed(word: &str, row: usize, col: usize, direction: Direction) -> PlacedWord
    {
        PlacedWord::new(&WordEntry::new(word, ""), row, col, direction)
    }

    fn sample() -> (Grid, Vec<PlacedWord>)
    {
        let mut grid = Grid::new(20);
        let words = vec![
            placed("HELLO", 10, 5, Direction::Across),
            placed("LOCAL", 10, 7, Direction::Down),
            placed("HI", 10, 5, Direction::Down),
            placed("CAT", 12, 7, Direction::Across),
        ];
        for w in &words
        {
            grid.place_word(&w.word, w.row, w.col, w.direction);
        }
        (grid, words)
    }

    #[test]
    fn test_finalize_trims_and_numbers()
    {
        let (grid, words) = sample();
        let dict = Dictionary::from_entries([("hello", "", 10), ("local", "", 20), ("cat", "", 40)], &DictionarySettings::default());

        let cw = finalize(&grid, words, &dict, PuzzleType::Crossword);

        assert_eq!((cw.width, cw.height), (5, 5));
        assert_eq!(cw.validate(), Ok(()));
        // HELLO and HI share 1, LOCAL starts at (0, 2), CAT at (2, 2)
        let numbers: Vec<(&str, Option<u32>)> = cw.words.iter().map(|w| (w.word.as_str(), w.clue_number)).collect();
        assert_eq!(numbers, vec![("HELLO", Some(1)), ("HI", Some(1)), ("LOCAL", Some(2)), ("CAT", Some(3))]);
        assert_eq!(cw.avg_playability, Some(18));
        assert_eq!(cw.render().lines().next(), Some("HELLO"));
    }

    #[test]
    fn test_finalize_empty_grid()
    {
        let cw = finalize(&Grid::new(30), vec![], &Dictionary::default(), PuzzleType::Crossword);

        assert_eq!((cw.width, cw.height), (0, 0));
        assert!(cw.words.is_empty());
        assert_eq!(cw.avg_playability, Some(0));
        assert_eq!(cw.validate(), Ok(()));
    }

    #[test]
    fn test_validate_catches_broken_data()
    {
        let (grid, words) = sample();
        let cw = finalize(&grid, words, &Dictionary::default(), PuzzleType::Crossword);

        let mut moved = cw.clone();
        moved.words[0].col += 1;
        assert!(matches!(moved.validate(), Err(CrosswordError::LetterMismatch { .. }) | Err(CrosswordError::WordOutOfBounds(_))));

        let mut duplicated = cw.clone();
        duplicated.words.push(duplicated.words[0].clone());
        assert_eq!(duplicated.validate(), Err(CrosswordError::WordAlreadyExists("HELLO".to_owned())));

        let mut renumbered = cw.clone();
        renumbered.words.iter_mut().for_each(|w| w.clue_number = w.clue_number.map(|n| n + 1));
        assert!(matches!(renumbered.validate(), Err(CrosswordError::ClueNumbering(_))));
    }

    #[test]
    fn test_serialized_shape()
    {
        let (grid, words) = sample();
        let cw = finalize(&grid, words, &Dictionary::default(), PuzzleType::Crossword);
        let json: serde_json::Value = serde_json::to_value(&cw).unwrap();

        assert_eq!(json["width"], 5);
        assert_eq!(json["puzzleType"], "crossword");
        assert_eq!(json["words"][0]["clueNumber"], 1);
        assert_eq!(json["words"][0]["direction"], "across");
        assert_eq!(json["grid"][1][1], serde_json::Value::Null);

        let back: CrosswordData = serde_json::from_value(json).unwrap();
        assert_eq!(back, cw);
    }
}
