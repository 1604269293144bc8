use std::cmp::Reverse;

use log::debug;
use rand::{seq::SliceRandom, Rng, RngCore};

use crate::{
    crossword::{CrosswordData, PuzzleType},
    dictionary::Dictionary,
    placement::playability_bonus,
    utils::ProgressReporter,
    word::WordEntry,
};

use super::{
    board::{best_by, place_in_passes, prepare_words, Board},
    fitted::fit_bonus,
    gap_fill::{fill_gaps, GapFill},
    PlacementStrategy,
};

pub const GRID_SIZE: usize = 30;

/// Largest random bump to a word's length when shuffling the placement order.
const ORDER_JITTER: usize = 2;

/// Makes several fitted style attempts with shuffled word orders and keeps the best result.
///
/// The first attempt uses the plain longest first order, later ones shuffle words and sort them
/// by a jittered length so words of similar length trade places.
#[derive(Clone, Debug)]
pub struct Smart
{
    pub retry_passes: usize,
    pub attempts: usize,
    /// Filler words added while filling gaps must score at least this.
    pub playability_floor: u32,
}

/// Weighted quality of a finished attempt, higher is better.
pub fn attempt_score(cw: &CrosswordData) -> f64
{
    cw.words.len() as f64 * 10.0
        + cw.density() * 50.0
        + cw.avg_playability.unwrap_or(0) as f64 * 0.2
        - (cw.width * cw.height) as f64 * 0.05
}

fn shuffled_order(words: &[WordEntry], rng: &mut dyn RngCore) -> Vec<WordEntry>
{
    let mut shuffled = words.to_vec();
    shuffled.shuffle(rng);

    let mut keyed: Vec<(usize, WordEntry)> = shuffled.into_iter().map(|w| (w.len() + rng.gen_range(0..=ORDER_JITTER), w)).collect();
    keyed.sort_by_key(|(key, _)| Reverse(*key));
    keyed.into_iter().map(|(_, w)| w).collect()
}

impl Smart
{
    fn attempt(&self, words: Vec<WordEntry>, dict: &Dictionary) -> CrosswordData
    {
        let mut board = Board::new(GRID_SIZE, dict);

        place_in_passes(&mut board, words, self.retry_passes, |board, entry, candidates, _|
        {
            let bonus = playability_bonus(board.dictionary().playability(&entry.word));
            best_by(candidates, |p| p.score + bonus + fit_bonus(board, entry.len(), p)).map(|(p, _)| p)
        });

        if !board.is_empty()
        {
            fill_gaps(&mut board, &GapFill { playability_floor: self.playability_floor, ..Default::default() });
        }
        board.finish(PuzzleType::Crossword)
    }
}

impl PlacementStrategy for Smart
{
    fn generate(&self, words: &[WordEntry], dict: &Dictionary, rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
    {
        let words = prepare_words(words, GRID_SIZE);
        if words.is_empty()
        {
            return CrosswordData::empty(PuzzleType::Crossword);
        }

        let attempts = self.attempts.max(1);
        let mut best: Option<(CrosswordData, f64)> = None;

        for attempt in 0..attempts
        {
            let order = if attempt == 0 { words.clone() } else { shuffled_order(&words, rng) };
            let cw = self.attempt(order, dict);
            let score = attempt_score(&cw);

            debug!("smart attempt {}: {} words, {}x{}, score {:.1}", attempt + 1, cw.words.len(), cw.width, cw.height, score);
            progress.report_step(format!("Attempt {}/{}: {} words placed", attempt + 1, attempts, cw.words.len()), attempt + 1, attempts, 5, 95);

            if best.as_ref().map_or(true, |(_, b)| score > *b)
            {
                best = Some((cw, score));
            }
        }

        best.map(|(cw, _)| cw).unwrap_or_else(|| CrosswordData::empty(PuzzleType::Crossword))
    }
}
