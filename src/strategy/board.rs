use std::collections::HashSet;

use log::trace;

use crate::{
    crossword::{finalize, CrosswordData, PuzzleType},
    dictionary::Dictionary,
    grid::{BoundingBox, Grid},
    placed_word::PlacedWord,
    placement::{centered_placement, find_placements, Placement},
    word::WordEntry,
};

/// Working state of one strategy invocation: the oversized grid and the words placed on it.
pub struct Board<'d>
{
    pub grid: Grid,
    pub placed: Vec<PlacedWord>,
    used: HashSet<String>,
    dict: &'d Dictionary,
}

impl<'d> Board<'d>
{
    pub fn new(size: usize, dict: &'d Dictionary) -> Board<'d>
    {
        Board { grid: Grid::new(size), placed: vec![], used: HashSet::new(), dict }
    }

    pub fn dictionary(&self) -> &'d Dictionary
    {
        self.dict
    }

    pub fn contains(&self, word: &str) -> bool
    {
        self.used.contains(word)
    }

    pub fn len(&self) -> usize
    {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.placed.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox
    {
        self.grid.bounding_box()
    }

    /// Lays the first word across the middle of the grid.
    pub fn seed(&mut self, entry: &WordEntry) -> bool
    {
        match centered_placement(&self.grid, &entry.word, self.dict)
        {
            Some(placement) if self.grid.is_empty() => { self.place(entry, &placement); true }
            _ => false,
        }
    }

    /// Legal placements of `entry`, none if the word is already on the board.
    pub fn candidates(&self, entry: &WordEntry) -> Vec<Placement>
    {
        if self.contains(&entry.word) { return vec![]; }
        find_placements(&self.grid, &self.placed, &entry.word, self.dict)
    }

    pub fn place(&mut self, entry: &WordEntry, placement: &Placement)
    {
        trace!("placing {} at ({}, {}) {:?}", entry.word, placement.row, placement.col, placement.direction);
        self.grid.place_word(&entry.word, placement.row, placement.col, placement.direction);
        self.placed.push(PlacedWord::new(entry, placement.row, placement.col, placement.direction));
        self.used.insert(entry.word.clone());
    }

    /// How many cells the bounding box gains if `len` letters are placed as `placement`.
    pub fn area_growth(&self, placement: &Placement, len: usize) -> usize
    {
        let current = self.bounding_box();
        current.union(&placement.bounding_box(len)).area() - current.area()
    }

    /// How much width plus height the bounding box gains.
    pub fn side_growth(&self, placement: &Placement, len: usize) -> usize
    {
        let current = self.bounding_box();
        let grown = current.union(&placement.bounding_box(len));
        (grown.width + grown.height) - (current.width + current.height)
    }

    /// Density of the bounding box after `placement`.
    pub fn density_after(&self, placement: &Placement, len: usize) -> f64
    {
        let grown = self.bounding_box().union(&placement.bounding_box(len));
        let filled = self.grid.filled_count() + len - placement.intersections;
        filled as f64 / grown.area().max(1) as f64
    }

    pub fn finish(self, puzzle_type: PuzzleType) -> CrosswordData
    {
        finalize(&self.grid, self.placed, self.dict, puzzle_type)
    }
}

/// Normalises the input words for placement.
///
/// Drops words that are not purely alphabetic, shorter than 2 letters or longer than `max_len`,
/// keeps the first of any repeated word and sorts longest first (stable, so equal lengths keep
/// their input order).
pub fn prepare_words(words: &[WordEntry], max_len: usize) -> Vec<WordEntry>
{
    let mut seen = HashSet::new();
    let mut words: Vec<WordEntry> = words
        .iter()
        .map(|w| WordEntry::new(&w.word, w.definition.clone()))
        .filter(|w| w.is_playable() && w.len() >= 2 && w.len() <= max_len)
        .filter(|w| seen.insert(w.word.clone()))
        .collect();

    words.sort_by(|a, b| b.len().cmp(&a.len()));
    words
}

/// Highest scoring placement, the first discovered one on ties.
pub fn best_by(placements: impl IntoIterator<Item = Placement>, mut score: impl FnMut(&Placement) -> f64) -> Option<(Placement, f64)>
{
    let mut best: Option<(Placement, f64)> = None;
    for placement in placements
    {
        let s = score(&placement);
        if best.as_ref().map_or(true, |(_, b)| s > *b)
        {
            best = Some((placement, s));
        }
    }
    best
}

/// Tries every word, then retries the failures for up to `retry_passes` more passes.
///
/// `choose` picks the placement to use among the legal ones (or refuses them all), it also gets
/// the pass number so acceptance can loosen over time. Returns the words that never got placed.
pub fn place_in_passes<F>(board: &mut Board, words: Vec<WordEntry>, retry_passes: usize, mut choose: F) -> Vec<WordEntry>
where
    F: FnMut(&Board, &WordEntry, Vec<Placement>, usize) -> Option<Placement>,
{
    let mut queue = words;

    for pass in 0..=retry_passes
    {
        if queue.is_empty() { break; }

        let before = queue.len();
        let mut failed = vec![];
        for entry in queue
        {
            if board.contains(&entry.word) { continue; }
            if board.grid.is_empty()
            {
                if !board.seed(&entry) { failed.push(entry); }
                continue;
            }

            let candidates = board.candidates(&entry);
            match choose(board, &entry, candidates, pass)
            {
                Some(placement) => board.place(&entry, &placement),
                None => failed.push(entry),
            }
        }

        trace!("pass {}: {} of {} words left", pass, failed.len(), before);
        // the first pass may be stricter than the retries, so it never ends the loop
        let stuck = failed.len() == before && pass > 0;
        queue = failed;
        if stuck { break; }
    }

    queue
}
