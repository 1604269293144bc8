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

pub const GRID_SIZE: usize = 40;

/// Words placed first as a tightly crossing core.
pub const SEED_COUNT: usize = 6;

/// Largest width plus height gain accepted for a single crossing placement on retries.
const MAX_SIDE_GROWTH: usize = 4;

const DENSITY_WEIGHT: f64 = 40.0;
const CROSSING_BONUS: f64 = 5.0;
const GROWTH_PENALTY: f64 = 3.0;

/// Builds a dense core out of letter-sharing words, then only accepts well connected placements.
///
/// On the first pass a word has to cross at least two words. Later passes also take a single
/// crossing as long as the bounding box barely grows.
#[derive(Clone, Debug)]
pub struct Dense
{
    pub retry_passes: usize,
}

fn letter_mask(word: &str) -> u32
{
    word.bytes().fold(0, |mask, b| mask | 1 << (b - b'A'))
}

/// Picks up to `count` words forming the core, as indices into `words`.
///
/// Starts from the first (longest) word, then repeatedly takes the word sharing the most distinct
/// letters with the words chosen so far. Stops early when nothing shares a letter any more.
pub fn select_seeds(words: &[WordEntry], count: usize) -> Vec<usize>
{
    if words.is_empty() { return vec![]; }

    let masks: Vec<u32> = words.iter().map(|w| letter_mask(&w.word)).collect();
    let mut chosen = vec![0];

    while chosen.len() < count
    {
        let best = (0..words.len())
            .filter(|i| !chosen.contains(i))
            .map(|i| (i, chosen.iter().map(|&c| (masks[i] & masks[c]).count_ones()).sum::<u32>()))
            .fold(None, |best: Option<(usize, u32)>, (i, overlap)| match best
            {
                Some((_, b)) if b >= overlap => best,
                _ => Some((i, overlap)),
            });

        match best
        {
            Some((i, overlap)) if overlap > 0 => chosen.push(i),
            _ => break,
        }
    }

    chosen
}

fn dense_score(board: &Board, len: usize, p: &Placement) -> f64
{
    p.score
        + board.density_after(p, len) * DENSITY_WEIGHT
        + p.intersections as f64 * CROSSING_BONUS
        - board.side_growth(p, len) as f64 * GROWTH_PENALTY
}

fn accepts(board: &Board, len: usize, p: &Placement, pass: usize) -> bool
{
    p.intersections >= 2 || (pass > 0 && p.intersections >= 1 && board.side_growth(p, len) <= MAX_SIDE_GROWTH)
}

impl PlacementStrategy for Dense
{
    fn generate(&self, words: &[WordEntry], dict: &Dictionary, _rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
    {
        let words = prepare_words(words, GRID_SIZE);
        let total = words.len();
        let seeds = select_seeds(&words, SEED_COUNT);
        let mut board = Board::new(GRID_SIZE, dict);

        progress.report("Building dense core", 10);
        let mut rest: Vec<WordEntry> = vec![];
        for &i in &seeds
        {
            let entry = &words[i];
            if board.is_empty()
            {
                board.seed(entry);
                continue;
            }
            match best_by(board.candidates(entry), |p| dense_score(&board, entry.len(), p))
            {
                Some((p, _)) => board.place(entry, &p),
                None => rest.push(entry.clone()),
            }
        }
        debug!("dense: core of {} words", board.len());
        rest.extend(words.iter().enumerate().filter(|(i, _)| !seeds.contains(i)).map(|(_, w)| w.clone()));

        progress.report("Placing remaining words", 40);
        let unplaced = place_in_passes(&mut board, rest, self.retry_passes, |board, entry, candidates, pass|
        {
            best_by(candidates.into_iter().filter(|p| accepts(board, entry.len(), p, pass)), |p| dense_score(board, entry.len(), p))
                .map(|(p, _)| p)
        });

        debug!("dense: placed {} of {} words", total - unplaced.len(), total);
        progress.report("Finishing grid", 90);
        board.finish(PuzzleType::Crossword)
    }
}

#[cfg(test)]
mod tests
{
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::settings::DictionarySettings;

    fn entries(words: &[&str]) -> Vec<WordEntry>
    {
        words.iter().map(|w| WordEntry::new(w, "")).collect()
    }

    #[test]
    fn test_seeds_share_letters()
    {
        let words = entries(&["STREAM", "QUIZ", "MASTER", "TEAMS", "JUG", "RATES"]);
        let seeds = select_seeds(&words, 4);

        assert_eq!(seeds[0], 0);
        assert_eq!(seeds.len(), 4);
        // words without a letter of STREAM never make the core
        assert!(!seeds.contains(&1));
        assert!(!seeds.contains(&4));
        assert!(select_seeds(&[], 6).is_empty());
    }

    #[test]
    fn test_single_crossings_wait_for_retries()
    {
        let dict = Dictionary::default();
        let mut board = Board::new(GRID_SIZE, &dict);
        board.seed(&WordEntry::new("horse", ""));
        let single = board.candidates(&WordEntry::new("hat", ""))[0];

        assert_eq!(single.intersections, 1);
        assert!(!accepts(&board, 3, &single, 0));
        assert!(accepts(&board, 3, &single, 1));
    }

    #[test]
    fn test_dense_output_is_valid()
    {
        let dict = Dictionary::from_entries([("ate", "", 1), ("tea", "", 1), ("eat", "", 1)], &DictionarySettings::default());
        let words = entries(&["theater", "heart", "earth", "hearth", "teeth", "treat", "hatter", "three"]);

        let cw = Dense { retry_passes: 3 }.generate(&words, &dict, &mut StdRng::seed_from_u64(5), &mut ProgressReporter::silent());

        assert_eq!(cw.validate(), Ok(()));
        assert!(cw.words.len() >= 3, "{}", cw.render());
    }
}
