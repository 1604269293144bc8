use log::debug;
use rand::RngCore;

use crate::{
    crossword::{CrosswordData, PuzzleType},
    dictionary::Dictionary,
    placement::center_distance,
    utils::ProgressReporter,
    word::WordEntry,
};

use super::{board::{best_by, place_in_passes, prepare_words, Board}, PlacementStrategy};

pub const GRID_SIZE: usize = 80;

/// The first strategy: a roomy grid, placements scored by crossings and closeness to the center only.
#[derive(Clone, Debug)]
pub struct Original
{
    pub retry_passes: usize,
}

impl PlacementStrategy for Original
{
    fn generate(&self, words: &[WordEntry], dict: &Dictionary, _rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
    {
        let words = prepare_words(words, GRID_SIZE);
        let total = words.len();
        let mut board = Board::new(GRID_SIZE, dict);

        progress.report("Placing words", 10);
        let unplaced = place_in_passes(&mut board, words, self.retry_passes, |board, entry, candidates, _|
        {
            best_by(candidates, |p| p.intersections as f64 * 10.0 - center_distance(&board.grid, entry.len(), p.row, p.col, p.direction))
                .map(|(p, _)| p)
        });

        debug!("original: placed {} of {} words", total - unplaced.len(), total);
        progress.report("Finishing grid", 90);
        board.finish(PuzzleType::Crossword)
    }
}
