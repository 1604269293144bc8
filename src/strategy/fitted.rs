use log::debug;
use rand::RngCore;

use crate::{
    crossword::{CrosswordData, PuzzleType},
    dictionary::Dictionary,
    placement::Placement,
    utils::ProgressReporter,
    word::WordEntry,
};

use super::{board::{best_by, place_in_passes, prepare_words, Board}, gap_fill::{fill_gaps, GapFill}, PlacementStrategy};

pub const GRID_SIZE: usize = 30;

pub(super) const INSIDE_BONUS: f64 = 20.0;
pub(super) const GROWTH_PENALTY: f64 = 2.0;

/// Keeps words inside the current bounds where possible, then fills the gaps with dictionary words.
#[derive(Clone, Debug)]
pub struct Fitted
{
    pub retry_passes: usize,
}

/// Rewards placements that stay inside the current bounding box.
pub(super) fn fit_bonus(board: &Board, len: usize, p: &Placement) -> f64
{
    if board.bounding_box().contains(&p.bounding_box(len))
    {
        INSIDE_BONUS
    }
    else
    {
        -(board.side_growth(p, len) as f64) * GROWTH_PENALTY
    }
}

impl PlacementStrategy for Fitted
{
    fn generate(&self, words: &[WordEntry], dict: &Dictionary, _rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
    {
        let words = prepare_words(words, GRID_SIZE);
        let total = words.len();
        let mut board = Board::new(GRID_SIZE, dict);

        progress.report("Fitting words", 10);
        let unplaced = place_in_passes(&mut board, words, self.retry_passes, |board, entry, candidates, _|
        {
            best_by(candidates, |p| p.score + fit_bonus(board, entry.len(), p)).map(|(p, _)| p)
        });
        debug!("fitted: placed {} of {} words", total - unplaced.len(), total);

        progress.report("Filling gaps", 70);
        if !board.is_empty()
        {
            fill_gaps(&mut board, &GapFill::default());
        }

        progress.report("Finishing grid", 90);
        board.finish(PuzzleType::Crossword)
    }
}

#[cfg(test)]
mod tests
{
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{settings::DictionarySettings, word::Direction};

    #[test]
    fn test_inside_placements_get_bonus()
    {
        let dict = Dictionary::default();
        let mut board = Board::new(GRID_SIZE, &dict);
        board.seed(&WordEntry::new("horse", ""));
        board.place(&WordEntry::new("hot", ""), &Placement { row: 15, col: 12, direction: Direction::Down, intersections: 1, score: 0.0 });

        let inside = Placement { row: 17, col: 12, direction: Direction::Across, intersections: 1, score: 0.0 };
        let outside = Placement { row: 15, col: 16, direction: Direction::Down, intersections: 1, score: 0.0 };

        assert_eq!(fit_bonus(&board, 3, &inside), INSIDE_BONUS);
        assert_eq!(fit_bonus(&board, 4, &outside), -GROWTH_PENALTY);
    }

    #[test]
    fn test_fitted_output_is_valid()
    {
        let dict = Dictionary::from_entries([("tent", "Camping shelter", 30), ("cat", "", 5), ("art", "", 5), ("cart", "", 5)], &DictionarySettings::default());
        let words: Vec<WordEntry> = ["cart", "cat", "art"].iter().map(|w| WordEntry::new(w, "")).collect();

        let cw = Fitted { retry_passes: 2 }.generate(&words, &dict, &mut StdRng::seed_from_u64(0), &mut ProgressReporter::silent());

        assert_eq!(cw.validate(), Ok(()));
        assert!(cw.words.iter().any(|w| w.word == "CAT"));
        assert!(cw.words.iter().any(|w| w.word == "ART"));
    }
}
