//! Fill-in puzzle engine.
//!
//! A fill-in starts from a symmetric black and white [template](template::Template) instead of a
//! word list. Its white runs become [slots](slots::Slot), the [solver](solver::Solver) assigns
//! dictionary words to them, [greedy_patch](patch::greedy_patch) fills what the solver left and
//! [assemble](assemble::assemble) turns the result into a [CrosswordData].

pub mod assemble;
pub mod patch;
pub mod slots;
pub mod solver;
pub mod template;

use std::collections::HashSet;

use log::debug;
use rand::RngCore;

use crate::{
    crossword::{CrosswordData, PuzzleType},
    dictionary::Dictionary,
    settings::FillinSettings,
    strategy::PlacementStrategy,
    utils::ProgressReporter,
    word::WordEntry,
};

use self::{assemble::assemble, patch::greedy_patch, slots::extract_slots, solver::Solver, template::generate_template};

const SOLVED_BONUS: f64 = 1000.0;
const COMPLETENESS_WEIGHT: f64 = 300.0;
const FILLED_WEIGHT: f64 = 5.0;
const PLAYABILITY_WEIGHT: f64 = 1.0;
const LENGTH_VARIETY_WEIGHT: f64 = 10.0;

/// Weighted quality of a fill, higher is better.
pub fn fill_score(cw: &CrosswordData, solved: bool, total_slots: usize) -> f64
{
    let filled = cw.words.len();
    let completeness = if total_slots == 0 { 0.0 } else { filled as f64 / total_slots as f64 };
    let lengths: HashSet<usize> = cw.words.iter().map(|w| w.len()).collect();

    (if solved { SOLVED_BONUS } else { 0.0 })
        + completeness * COMPLETENESS_WEIGHT
        + filled as f64 * FILLED_WEIGHT
        + cw.avg_playability.unwrap_or(0) as f64 * PLAYABILITY_WEIGHT
        + lengths.len() as f64 * LENGTH_VARIETY_WEIGHT
}

/// Generates a fill-in puzzle from the whole dictionary.
///
/// Runs [attempts](FillinSettings::attempts) template + solve cycles, each solving the template
/// [restarts_per_template](FillinSettings::restarts_per_template) times, and keeps the best scoring
/// fill. Stops as soon as some fill covers every slot. If nothing could be filled at all the
/// empty crossword is returned.
pub fn generate_fillin(dict: &Dictionary, settings: &FillinSettings, rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
{
    let attempts = settings.attempts.max(1);
    let restarts = settings.restarts_per_template.max(1);
    let total = attempts * restarts;
    let mut best: Option<(CrosswordData, f64)> = None;

    progress.report("Generating templates", 0);

    'attempts: for attempt in 0..attempts
    {
        let template = generate_template(settings, rng);
        let slots = extract_slots(&template, settings.min_slot_length);
        debug!("fill-in attempt {}: {} slots\n{}", attempt + 1, slots.len(), template.render());

        for restart in 0..restarts
        {
            let mut solver = Solver::new(&slots, dict, settings.backtrack_limit, settings.shuffle_window);
            let outcome = solver.solve(rng);

            let mut assignments = outcome.assignments;
            greedy_patch(&slots, &mut assignments, dict);
            let filled = assignments.iter().flatten().count();

            let cw = assemble(&template, &slots, &assignments, dict);
            let score = fill_score(&cw, outcome.solved, slots.len());
            let step = attempt * restarts + restart + 1;
            progress.report_step(format!("Attempt {}/{}: {}/{} slots filled", attempt + 1, attempts, filled, slots.len()), step, total, 5, 95);

            if best.as_ref().map_or(true, |(_, b)| score > *b)
            {
                best = Some((cw, score));
            }

            if !slots.is_empty() && filled == slots.len()
            {
                debug!("fill-in: complete fill after {} solves", step);
                break 'attempts;
            }
        }
    }

    progress.report("Done", 100);
    best.map(|(cw, _)| cw).unwrap_or_else(|| CrosswordData::empty(PuzzleType::Fillin))
}

/// The fill-in generator as a [PlacementStrategy], the word list is ignored.
#[derive(Clone, Debug)]
pub struct Fillin
{
    pub settings: FillinSettings,
}

impl PlacementStrategy for Fillin
{
    fn generate(&self, _words: &[WordEntry], dict: &Dictionary, rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData
    {
        generate_fillin(dict, &self.settings, rng, progress)
    }
}
