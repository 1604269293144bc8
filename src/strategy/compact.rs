use log::debug;
use rand::RngCore;

use crate::{
    crossword::{CrosswordData, PuzzleType},
    dictionary::Dictionary,
    placement::Placement,
    utils::ProgressReporter,
    word::WordEntry,
};

use super::{board::{best_by, place_in_passes, prepare_words, Board}, PlacementStrategy};

pub const GRID_SIZE: usize = 50;

const DENSITY_WEIGHT: f64 = 30.0;
const GROWTH_PENALTY: f64 = 0.5;

/// Prefers placements that keep the bounding box small and full.
#[derive(Clone, Debug)]
pub struct Compact
{
    pub retry_passes: usize,
}

fn compact_score(board: &Board, len: usize, p: &Placement) -> f64
{
    p.score + board.density_after(p, len) * DENSITY_WEIGHT - board.area_growth(p, len) as f64 * GROWTH_PENALTY
}

impl PlacementStrategy for Compact
{
    fn generate(&self, words: &[WordEntry], dict: &Dictionary, _rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
    {
        let words = prepare_words(words, GRID_SIZE);
        let total = words.len();
        let mut board = Board::new(GRID_SIZE, dict);

        progress.report("Placing words compactly", 10);
        let unplaced = place_in_passes(&mut board, words, self.retry_passes, |board, entry, candidates, _|
        {
            best_by(candidates, |p| compact_score(board, entry.len(), p)).map(|(p, _)| p)
        });

        debug!("compact: placed {} of {} words", total - unplaced.len(), total);
        progress.report("Finishing grid", 90);
        board.finish(PuzzleType::Crossword)
    }
}
