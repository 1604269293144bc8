use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{grid::BoundingBox, word::{Direction, WordEntry}};

/// A possible start position for a word, produced by lining it up with a letter of a placed word.
///
/// Coordinates can be negative, the anchor still has to be validated against the grid.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Debug)]
pub struct Anchor
{
    pub row: isize,
    pub col: isize,
    pub direction: Direction,
}

/// Represents a word placed in a grid, (`row`, `col`) is the position of its first letter.
///
/// The clue number is only known once the grid is [finalized](crate::crossword::finalize).
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWord
{
    pub word: String,
    pub definition: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue_number: Option<u32>,
}

impl PlacedWord
{
    pub fn new(entry: &WordEntry, row: usize, col: usize, direction: Direction) -> PlacedWord
    {
        PlacedWord { word: entry.word.clone(), definition: entry.definition.clone(), row, col, direction, clue_number: None }
    }

    pub fn len(&self) -> usize
    {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.word.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox
    {
        BoundingBox::for_word(self.row, self.col, self.direction, self.len())
    }

    /// Grid position of the `index`-th letter.
    pub fn cell(&self, index: usize) -> (usize, usize)
    {
        match self.direction
        {
            Direction::Across => (self.row, self.col + index),
            Direction::Down => (self.row + index, self.col),
        }
    }

    /// Every (row, col, letter) covered by the word.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_
    {
        self.word.bytes().enumerate().map(|(i, letter)|
        {
            let (r, c) = self.cell(i);
            (r, c, letter)
        })
    }

    /// Returns true if a word of length `len` at (`row`, `col`) would run along this word, sharing at least one cell in the same direction.
    pub fn runs_along(&self, row: usize, col: usize, direction: Direction, len: usize) -> bool
    {
        self.direction == direction && self.bounding_box().intersects(&BoundingBox::for_word(row, col, direction, len))
    }

    /// Returns all positions at which `word` crosses this word on a shared letter.
    ///
    /// ## Examples
    /// ```
    /// # use crossword_engine::placed_word::{Anchor, PlacedWord};
    /// # use crossword_engine::word::{Direction, WordEntry};
    /// let hello = PlacedWord::new(&WordEntry::new("hello", ""), 3, 0, Direction::Across);
    ///
    /// //     w w
    /// //     o o
    /// //     r r w
    /// // h e l l o ---> 3 ways
    /// //     d d r
    /// //         l
    /// //         d
    ///
    /// assert_eq!(hello.intersection_anchors("WORLD"), vec![
    ///     Anchor { row: 0, col: 2, direction: Direction::Down },
    ///     Anchor { row: 0, col: 3, direction: Direction::Down },
    ///     Anchor { row: 2, col: 4, direction: Direction::Down },
    /// ]);
    /// ```
    pub fn intersection_anchors(&self, word: &str) -> Vec<Anchor>
    {
        let mine = self.word.as_bytes();

        word.bytes()
            .enumerate()
            .cartesian_product(mine.iter().enumerate())
            .filter(|((_, a), (_, b))| a == *b)
            .map(|((word_ind, _), (self_ind, _))| match self.direction
            {
                Direction::Across => Anchor { row: self.row as isize - word_ind as isize, col: (self.col + self_ind) as isize, direction: Direction::Down },
                Direction::Down => Anchor { row: (self.row + self_ind) as isize, col: self.col as isize - word_ind as isize, direction: Direction::Across },
            })
            .sorted()
            .dedup()
            .collect()
    }
}
