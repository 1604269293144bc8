use serde::{Deserialize, Serialize};

use crate::word::Direction;

/// Minimal rectangle enclosing a set of cells.
///
/// A box with zero width or height is degenerate and contains nothing.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
pub struct BoundingBox
{
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox
{
    /// The box covered by a word of length `len` starting at (`row`, `col`).
    pub fn for_word(row: usize, col: usize, direction: Direction, len: usize) -> BoundingBox
    {
        match direction
        {
            Direction::Across => BoundingBox { row, col, width: len, height: 1 },
            Direction::Down => BoundingBox { row, col, width: 1, height: len },
        }
    }

    pub fn is_empty(&self) -> bool
    {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize
    {
        self.width * self.height
    }

    pub fn bottom(&self) -> usize
    {
        self.row + self.height
    }

    pub fn right(&self) -> usize
    {
        self.col + self.width
    }

    /// Smallest box containing both boxes, a degenerate box contributes nothing.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox
    {
        if self.is_empty() { return *other; }
        if other.is_empty() { return *self; }

        let row = self.row.min(other.row);
        let col = self.col.min(other.col);
        BoundingBox
        {
            row,
            col,
            width: self.right().max(other.right()) - col,
            height: self.bottom().max(other.bottom()) - row,
        }
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool
    {
        (self.col < other.right() && self.right() > other.col) &&
        (self.row < other.bottom() && self.bottom() > other.row)
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool
    {
        !self.is_empty() &&
        other.row >= self.row && other.bottom() <= self.bottom() &&
        other.col >= self.col && other.right() <= self.right()
    }
}

/// Bounded, mutable letter grid used as the working area of a placement strategy.
///
/// Cells hold uppercase ASCII letters or nothing. Out of bounds reads through the signed
/// accessors behave like empty cells, writes out of bounds are a programming error and panic.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Grid
{
    width: usize,
    height: usize,
    cells: Vec<Option<u8>>,
    filled: usize,
}

impl Grid
{
    /// Creates an all-empty square grid.
    pub fn new(size: usize) -> Grid
    {
        Grid::with_dimensions(size, size)
    }

    pub fn with_dimensions(width: usize, height: usize) -> Grid
    {
        Grid { width, height, cells: vec![None; width * height], filled: 0 }
    }

    pub fn width(&self) -> usize
    {
        self.width
    }

    pub fn height(&self) -> usize
    {
        self.height
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool
    {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8>
    {
        assert!(row < self.height && col < self.width, "cell ({row}, {col}) is outside of a {}x{} grid", self.width, self.height);
        self.cells[row * self.width + col]
    }

    /// Letter at a possibly out of bounds position, None for empty or outside cells.
    pub fn letter_at(&self, row: isize, col: isize) -> Option<u8>
    {
        if self.in_bounds(row, col) { self.cells[row as usize * self.width + col as usize] } else { None }
    }

    pub fn is_vacant(&self, row: isize, col: isize) -> bool
    {
        self.letter_at(row, col).is_none()
    }

    /// Writes every letter of `word` starting at (`row`, `col`).
    ///
    /// The placement must have been validated before, nothing is checked except bounds.
    pub fn place_word(&mut self, word: &str, row: usize, col: usize, direction: Direction)
    {
        let (dr, dc) = direction.delta();
        for (i, letter) in word.bytes().enumerate()
        {
            let r = row + i * dr as usize;
            let c = col + i * dc as usize;
            assert!(r < self.height && c < self.width, "word {word} does not fit at ({row}, {col}) {direction:?}");

            let cell = &mut self.cells[r * self.width + c];
            if cell.is_none() { self.filled += 1; }
            *cell = Some(letter);
        }
    }

    pub fn is_empty(&self) -> bool
    {
        self.filled == 0
    }

    pub fn filled_count(&self) -> usize
    {
        self.filled
    }

    /// Minimal box containing every filled cell, degenerate if the grid is empty.
    pub fn bounding_box(&self) -> BoundingBox
    {
        if self.is_empty() { return BoundingBox::default(); }

        let (mut min_r, mut min_c, mut max_r, mut max_c) = (usize::MAX, usize::MAX, 0, 0);
        for r in 0..self.height
        {
            for c in 0..self.width
            {
                if self.cells[r * self.width + c].is_some()
                {
                    min_r = min_r.min(r);
                    min_c = min_c.min(c);
                    max_r = max_r.max(r);
                    max_c = max_c.max(c);
                }
            }
        }

        BoundingBox { row: min_r, col: min_c, width: max_c - min_c + 1, height: max_r - min_r + 1 }
    }

    pub fn filled_in(&self, bbox: &BoundingBox) -> usize
    {
        (bbox.row..bbox.bottom().min(self.height))
            .map(|r| (bbox.col..bbox.right().min(self.width)).filter(|&c| self.cells[r * self.width + c].is_some()).count())
            .sum()
    }

    /// Fraction of filled cells inside `bbox`, 0 for a zero area box.
    pub fn density(&self, bbox: &BoundingBox) -> f64
    {
        if bbox.is_empty() { return 0.0; }
        self.filled_in(bbox) as f64 / bbox.area() as f64
    }

    /// Crops the grid to its bounding box.
    ///
    /// Returns the cropped grid and the (row, col) offset that was cut away, which has to be
    /// subtracted from coordinates of words placed in this grid.
    pub fn trim(&self) -> (Grid, (usize, usize))
    {
        let bbox = self.bounding_box();
        let mut trimmed = Grid::with_dimensions(bbox.width, bbox.height);
        for r in 0..bbox.height
        {
            for c in 0..bbox.width
            {
                let cell = self.cells[(r + bbox.row) * self.width + c + bbox.col];
                if cell.is_some() { trimmed.filled += 1; }
                trimmed.cells[r * bbox.width + c] = cell;
            }
        }

        (trimmed, (bbox.row, bbox.col))
    }

    /// Rows of the grid as characters, None for empty cells.
    pub fn to_rows(&self) -> Vec<Vec<Option<char>>>
    {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|c| c.map(char::from)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_empty_grid_has_degenerate_box()
    {
        let grid = Grid::new(10);
        let bbox = grid.bounding_box();

        assert!(grid.is_empty());
        assert!(bbox.is_empty());
        assert_eq!(grid.density(&bbox), 0.0);

        let (trimmed, offset) = grid.trim();
        assert_eq!((trimmed.width(), trimmed.height(), offset), (0, 0, (0, 0)));
        assert!(trimmed.to_rows().is_empty());
    }

    #[test]
    fn test_place_word_and_trim()
    {
        let mut grid = Grid::new(10);                      //  h e l l o
        grid.place_word("HELLO", 3, 2, Direction::Across); //      o
        grid.place_word("LOCAL", 3, 4, Direction::Down);   //      c
                                                           //      a
                                                           //      l
        assert_eq!(grid.filled_count(), 9);
        assert_eq!(grid.bounding_box(), BoundingBox { row: 3, col: 2, width: 5, height: 5 });
        assert_eq!(grid.density(&grid.bounding_box()), 9.0 / 25.0);

        let (trimmed, offset) = grid.trim();
        assert_eq!(offset, (3, 2));
        assert_eq!(trimmed.width(), 5);
        assert_eq!(trimmed.height(), 5);
        assert_eq!(trimmed.get(0, 0), Some(b'H'));
        assert_eq!(trimmed.get(4, 2), Some(b'L'));
        assert_eq!(trimmed.get(4, 4), None);
        assert_eq!(trimmed.filled_count(), 9);
    }

    #[test]
    fn test_out_of_bounds_reads_are_vacant()
    {
        let mut grid = Grid::new(3);
        grid.place_word("CAT", 0, 0, Direction::Across);

        assert_eq!(grid.letter_at(0, 1), Some(b'A'));
        assert!(grid.is_vacant(-1, 0));
        assert!(grid.is_vacant(0, 3));
    }

    #[test]
    #[should_panic]
    fn test_place_word_out_of_bounds_panics()
    {
        let mut grid = Grid::new(3);
        grid.place_word("CATS", 0, 0, Direction::Across);
    }

    #[test]
    fn test_box_union_and_contains()
    {
        let a = BoundingBox::for_word(2, 2, Direction::Across, 4);
        let b = BoundingBox::for_word(0, 3, Direction::Down, 5);
        let u = a.union(&b);

        assert_eq!(u, BoundingBox { row: 0, col: 2, width: 4, height: 5 });
        assert!(u.contains(&a) && u.contains(&b));
        assert!(!a.contains(&b));
        assert_eq!(BoundingBox::default().union(&a), a);
    }
}
