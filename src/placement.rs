use std::collections::HashSet;

use log::trace;

use crate::{dictionary::Dictionary, grid::{BoundingBox, Grid}, placed_word::PlacedWord, word::Direction};

/// Represents one legal way to put a word on the grid.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Placement
{
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    /// Letters shared with words already on the grid.
    pub intersections: usize,
    pub score: f64,
}

impl Placement
{
    pub fn bounding_box(&self, len: usize) -> BoundingBox
    {
        BoundingBox::for_word(self.row, self.col, self.direction, len)
    }
}

/// Returns every legal placement of `word` crossing the words already on the grid, in discovery order.
///
/// On an empty grid the only candidate is the word laid across the middle row, centered.
///
/// A candidate is legal when
/// 1. it fits inside the grid,
/// 2. the cells right before its first and after its last letter are empty,
/// 3. every covered cell is empty or already holds the same letter,
/// 4. every perpendicular run created by a newly filled cell is a dictionary word,
/// 5. it crosses at least one placed word and does not run along any of them.
///
/// ```
/// # use crossword_engine::dictionary::Dictionary;
/// # use crossword_engine::grid::Grid;
/// # use crossword_engine::placed_word::PlacedWord;
/// # use crossword_engine::placement::find_placements;
/// # use crossword_engine::settings::DictionarySettings;
/// # use crossword_engine::word::{Direction, WordEntry};
/// let dict = Dictionary::from_entries([("cat", "", 1), ("car", "", 1)], &DictionarySettings::default());
/// let mut grid = Grid::new(9);
/// grid.place_word("CAT", 4, 3, Direction::Across);
/// let placed = vec![PlacedWord::new(&WordEntry::new("cat", ""), 4, 3, Direction::Across)];
///
/// let placements = find_placements(&grid, &placed, "CAR", &dict);
/// assert!(placements.iter().all(|p| p.direction == Direction::Down && p.intersections == 1));
/// assert_eq!(placements.len(), 2);
/// ```
pub fn find_placements(grid: &Grid, placed: &[PlacedWord], word: &str, dict: &Dictionary) -> Vec<Placement>
{
    if grid.is_empty()
    {
        return centered_placement(grid, word, dict).into_iter().collect();
    }

    let mut seen = HashSet::new();
    let placements: Vec<Placement> = placed
        .iter()
        .flat_map(|p| p.intersection_anchors(word))
        .filter(|anchor| seen.insert(*anchor))
        .filter_map(|anchor|
        {
            let intersections = check_placement(grid, placed, word, anchor.row, anchor.col, anchor.direction, dict)?;
            let (row, col) = (anchor.row as usize, anchor.col as usize);
            Some(Placement { row, col, direction: anchor.direction, intersections, score: base_score(grid, word, row, col, anchor.direction, intersections, dict) })
        })
        .collect();

    trace!("{} placements for {}", placements.len(), word);
    placements
}

/// The placement used for the first word: across the middle row, horizontally centered.
pub fn centered_placement(grid: &Grid, word: &str, dict: &Dictionary) -> Option<Placement>
{
    if word.is_empty() || word.len() > grid.width() || grid.height() == 0 { return None; }

    let row = grid.height() / 2;
    let col = (grid.width() - word.len()) / 2;
    Some(Placement { row, col, direction: Direction::Across, intersections: 0, score: base_score(grid, word, row, col, Direction::Across, 0, dict) })
}

/// Validates a placement of `word` starting at (`row`, `col`).
///
/// Returns the number of intersections with letters already on the grid, or None if the placement
/// is not legal. See [find_placements] for the rules.
pub fn check_placement(grid: &Grid, placed: &[PlacedWord], word: &str, row: isize, col: isize, direction: Direction, dict: &Dictionary) -> Option<usize>
{
    let letters = word.as_bytes();
    let len = letters.len() as isize;
    let (dr, dc) = direction.delta();

    if len == 0 { return None; }

    // bounds
    if !grid.in_bounds(row, col) || !grid.in_bounds(row + dr * (len - 1), col + dc * (len - 1))
    {
        return None;
    }

    // no extension of a word already on the grid
    if !grid.is_vacant(row - dr, col - dc) || !grid.is_vacant(row + dr * len, col + dc * len)
    {
        return None;
    }

    if placed.iter().any(|p| p.runs_along(row as usize, col as usize, direction, letters.len()))
    {
        return None;
    }

    let (pr, pc) = direction.opposite().delta();
    let mut intersections = 0;

    for (i, &letter) in letters.iter().enumerate()
    {
        let r = row + dr * i as isize;
        let c = col + dc * i as isize;

        match grid.letter_at(r, c)
        {
            Some(existing) if existing == letter => intersections += 1,
            Some(_) => return None,
            None =>
            {
                if let Some(run) = perpendicular_run(grid, r, c, pr, pc, letter)
                {
                    if !dict.is_valid_word(&run)
                    {
                        trace!("{} at ({}, {}) would form {}", word, row, col, run);
                        return None;
                    }
                }
            }
        }
    }

    if intersections == 0 && !grid.is_empty()
    {
        return None;
    }
    if intersections == letters.len()
    {
        return None;
    }

    Some(intersections)
}

/// The run that `letter` written at (`row`, `col`) would form with its neighbours along (`pr`, `pc`).
///
/// Returns None if the letter would stay on its own in that direction.
fn perpendicular_run(grid: &Grid, row: isize, col: isize, pr: isize, pc: isize, letter: u8) -> Option<String>
{
    let mut before = vec![];
    let (mut r, mut c) = (row - pr, col - pc);
    while let Some(l) = grid.letter_at(r, c)
    {
        before.push(l);
        r -= pr;
        c -= pc;
    }

    let mut after = vec![];
    let (mut r, mut c) = (row + pr, col + pc);
    while let Some(l) = grid.letter_at(r, c)
    {
        after.push(l);
        r += pr;
        c += pc;
    }

    if before.is_empty() && after.is_empty() { return None; }

    Some(before.iter().rev().chain(std::iter::once(&letter)).chain(after.iter()).map(|&l| char::from(l)).collect())
}

/// Manhattan distance between the middle of the word and the middle of the grid.
pub fn center_distance(grid: &Grid, len: usize, row: usize, col: usize, direction: Direction) -> f64
{
    let (dr, dc) = direction.delta();
    let half = (len.saturating_sub(1)) as f64 / 2.0;
    let word_r = row as f64 + dr as f64 * half;
    let word_c = col as f64 + dc as f64 * half;

    (word_r - grid.height() as f64 / 2.0).abs() + (word_c - grid.width() as f64 / 2.0).abs()
}

/// Shared base score: intersections are worth 10, distance from the grid center costs 1 per cell
/// and popular words get a logarithmic bonus.
pub fn base_score(grid: &Grid, word: &str, row: usize, col: usize, direction: Direction, intersections: usize, dict: &Dictionary) -> f64
{
    intersections as f64 * 10.0
        - center_distance(grid, word.len(), row, col, direction)
        + playability_bonus(dict.playability(word))
}

pub fn playability_bonus(playability: u32) -> f64
{
    (playability as f64 + 1.0).ln() * 2.0
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{settings::DictionarySettings, word::WordEntry};

    fn dict(words: &[&str]) -> Dictionary
    {
        Dictionary::from_entries(words.iter().map(|w| (*w, "", 10)), &DictionarySettings::default())
    }

    fn seeded(word: &str, size: usize) -> (Grid, Vec<PlacedWord>)
    {
        let mut grid = Grid::new(size);
        let placement = centered_placement(&grid, word, &Dictionary::default()).unwrap();
        grid.place_word(word, placement.row, placement.col, placement.direction);
        let placed = vec![PlacedWord::new(&WordEntry::new(word, ""), placement.row, placement.col, placement.direction)];
        (grid, placed)
    }

    #[test]
    fn test_car_crosses_seeded_cat()
    {
        let dict = dict(&["CAT", "CAR", "ART"]);
        let (grid, placed) = seeded("CAT", 11);

        let placements = find_placements(&grid, &placed, "CAR", &dict);
        assert!(!placements.is_empty());
        for p in &placements
        {
            assert_eq!(p.direction, Direction::Down);
            assert_eq!(p.intersections, 1);
            assert!(check_placement(&grid, &placed, "CAR", p.row as isize, p.col as isize, p.direction, &dict).is_some());
        }
        // crossing at C puts CAR below the C, crossing at A puts it through the A
        assert!(placements.iter().any(|p| p.row == 5 && p.col == 4));
        assert!(placements.iter().any(|p| p.row == 4 && p.col == 5));
    }

    #[test]
    fn test_empty_grid_yields_centered_candidate()
    {
        let grid = Grid::new(10);
        let placements = find_placements(&grid, &[], "HELLO", &Dictionary::default());

        assert_eq!(placements.len(), 1);
        assert_eq!((placements[0].row, placements[0].col, placements[0].direction), (5, 2, Direction::Across));
        assert!(find_placements(&grid, &[], "ELEVENLETTERS", &Dictionary::default()).is_empty());
    }

    #[test]
    fn test_rejects_extension_and_conflicts()
    {
        let dict = dict(&["CAT", "TEA", "CATS"]);
        let (grid, placed) = seeded("CAT", 11);

        // TEA down from the T of CAT is fine
        assert_eq!(check_placement(&grid, &placed, "TEA", 5, 6, Direction::Down, &dict), Some(1));
        // TEA across starting right after CAT would lengthen it
        assert_eq!(check_placement(&grid, &placed, "TEA", 5, 7, Direction::Across, &dict), None);
        // CATS across on top of CAT runs along it
        assert_eq!(check_placement(&grid, &placed, "CATS", 5, 4, Direction::Across, &dict), None);
        // letter conflict
        assert_eq!(check_placement(&grid, &placed, "TEA", 4, 5, Direction::Down, &dict), None);
        // out of bounds
        assert_eq!(check_placement(&grid, &placed, "TEA", 9, 6, Direction::Down, &dict), None);
        // no intersection at all
        assert_eq!(check_placement(&grid, &placed, "TEA", 0, 0, Direction::Down, &dict), None);
    }

    #[test]
    fn test_incidental_words_must_be_in_dictionary()
    {
        // C A T
        //     O
        let (mut grid, mut placed) = seeded("CAT", 11);
        grid.place_word("TO", 5, 6, Direction::Down);
        placed.push(PlacedWord::new(&WordEntry::new("to", ""), 5, 6, Direction::Down));

        // ON across at (6, 6) shares the O, the N touches nothing
        let permissive = dict(&["CAT", "TO", "ON"]);
        assert_eq!(check_placement(&grid, &placed, "ON", 6, 6, Direction::Across, &permissive), Some(1));

        // NO across ending on the O at (6, 5)..(6, 6) puts N under the A, forming AN
        assert_eq!(check_placement(&grid, &placed, "NO", 6, 5, Direction::Across, &permissive), None);
        let with_an = dict(&["CAT", "TO", "NO", "AN"]);
        assert_eq!(check_placement(&grid, &placed, "NO", 6, 5, Direction::Across, &with_an), Some(1));
    }

    #[test]
    fn test_score_prefers_intersections_and_center()
    {
        let grid = Grid::new(10);
        let dict = Dictionary::default();
        let center = base_score(&grid, "ABCDE", 5, 3, Direction::Across, 1, &dict);
        let corner = base_score(&grid, "ABCDE", 0, 0, Direction::Across, 1, &dict);
        let crossing = base_score(&grid, "ABCDE", 0, 0, Direction::Across, 3, &dict);

        assert!(center > corner);
        assert!(crossing > corner);
        assert_eq!(center_distance(&grid, 5, 5, 3, Direction::Across), 0.0);
    }
}
