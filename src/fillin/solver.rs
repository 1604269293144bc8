use std::{cmp::Reverse, collections::{BTreeSet, HashSet}};

use log::{debug, trace};
use rand::{seq::SliceRandom, RngCore};

use crate::dictionary::Dictionary;

use super::slots::Slot;

/// Flat solver state indexed by slot id.
///
/// Words are stored as indices into [Dictionary::words_of_length] for the slot's length, so a
/// lower index means a more playable word.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SolverState
{
    pub assignments: Vec<Option<u32>>,
    pub domains: Vec<BTreeSet<u32>>,
}

/// What a [solver](Solver) run ended with.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SolveOutcome
{
    /// Every slot got a word.
    pub solved: bool,
    /// The full assignment when solved, otherwise the best partial one seen during the search.
    pub assignments: Vec<Option<String>>,
    pub backtracks: usize,
    /// Most slots that were assigned at the same time.
    pub best_filled: usize,
}

/// Backtracking search with MRV variable ordering and forward checking.
///
/// Assignments are undone through a removal log per decision instead of copying the state, and the
/// whole search gives up once `backtrack_limit` backtracks have happened.
pub struct Solver<'a>
{
    slots: &'a [Slot],
    dict: &'a Dictionary,
    backtrack_limit: usize,
    shuffle_window: usize,
    state: SolverState,
    used: HashSet<(usize, u32)>,
    backtracks: usize,
    aborted: bool,
    best: Vec<Option<u32>>,
    best_filled: usize,
}

impl<'a> Solver<'a>
{
    pub fn new(slots: &'a [Slot], dict: &'a Dictionary, backtrack_limit: usize, shuffle_window: usize) -> Solver<'a>
    {
        let domains = slots.iter().map(|s| (0..dict.words_of_length(s.length).len() as u32).collect()).collect();

        Solver
        {
            slots,
            dict,
            backtrack_limit,
            shuffle_window,
            state: SolverState { assignments: vec![None; slots.len()], domains },
            used: HashSet::new(),
            backtracks: 0,
            aborted: false,
            best: vec![None; slots.len()],
            best_filled: 0,
        }
    }

    pub fn state(&self) -> &SolverState
    {
        &self.state
    }

    pub fn backtracks(&self) -> usize
    {
        self.backtracks
    }

    pub fn solve(&mut self, rng: &mut dyn RngCore) -> SolveOutcome
    {
        let solved = self.search(rng);
        let assignments = if solved { &self.state.assignments } else { &self.best };

        debug!("solver: solved {}, {} backtracks, best {} of {} slots", solved, self.backtracks, self.best_filled, self.slots.len());

        SolveOutcome
        {
            solved,
            assignments: assignments.iter().enumerate().map(|(slot, a)| a.map(|w| self.word(slot, w).to_owned())).collect(),
            backtracks: self.backtracks,
            best_filled: if solved { self.slots.len() } else { self.best_filled },
        }
    }

    fn word(&self, slot: usize, index: u32) -> &'a str
    {
        let dict: &'a Dictionary = self.dict;
        &dict.words_of_length(self.slots[slot].length)[index as usize]
    }

    fn letter(&self, slot: usize, index: u32, position: usize) -> u8
    {
        self.word(slot, index).as_bytes()[position]
    }

    fn search(&mut self, rng: &mut dyn RngCore) -> bool
    {
        let filled = self.state.assignments.iter().filter(|a| a.is_some()).count();
        if filled > self.best_filled
        {
            self.best_filled = filled;
            self.best = self.state.assignments.clone();
        }

        let Some(slot) = self.select_slot()
        else
        {
            return true;
        };
        let len = self.slots[slot].length;

        for value in self.candidates(slot, rng)
        {
            trace!("slot {} <- {}", slot, self.word(slot, value));
            self.state.assignments[slot] = Some(value);
            self.used.insert((len, value));

            let (removals, wipeout) = self.forward_check(slot, value);
            if !wipeout && self.search(rng)
            {
                return true;
            }

            self.restore(removals);
            self.state.assignments[slot] = None;
            self.used.remove(&(len, value));

            if self.aborted { return false; }
            self.backtracks += 1;
            if self.backtracks >= self.backtrack_limit
            {
                debug!("solver: backtrack limit {} reached", self.backtrack_limit);
                self.aborted = true;
                return false;
            }
        }

        false
    }

    /// Unassigned slot with the smallest domain, the one with more crossings on ties.
    fn select_slot(&self) -> Option<usize>
    {
        (0..self.slots.len())
            .filter(|&i| self.state.assignments[i].is_none())
            .min_by_key(|&i| (self.state.domains[i].len(), Reverse(self.slots[i].crossings.len())))
    }

    /// Unused domain words agreeing with every assigned crossing, with the first
    /// `shuffle_window` of them shuffled.
    fn candidates(&self, slot: usize, rng: &mut dyn RngCore) -> Vec<u32>
    {
        let len = self.slots[slot].length;
        let fixed: Vec<(usize, u8)> = self.slots[slot]
            .crossings
            .iter()
            .filter_map(|c| self.state.assignments[c.other_slot].map(|w| (c.index_in_slot, self.letter(c.other_slot, w, c.index_in_other))))
            .collect();

        let mut candidates: Vec<u32> = self.state.domains[slot]
            .iter()
            .copied()
            .filter(|&w| !self.used.contains(&(len, w)))
            .filter(|&w| fixed.iter().all(|&(i, letter)| self.letter(slot, w, i) == letter))
            .collect();

        let window = self.shuffle_window.min(candidates.len());
        candidates[..window].shuffle(rng);
        candidates
    }

    /// Prunes the domains of unassigned crossing slots after `slot` got `value`.
    ///
    /// Returns the removed (slot, word) pairs and whether some domain ran empty.
    fn forward_check(&mut self, slot: usize, value: u32) -> (Vec<(usize, u32)>, bool)
    {
        let slots = self.slots;
        let mut removals = vec![];

        for crossing in &slots[slot].crossings
        {
            let other = crossing.other_slot;
            if self.state.assignments[other].is_some() { continue; }

            let letter = self.letter(slot, value, crossing.index_in_slot);
            let conflicting: Vec<u32> = self.state.domains[other]
                .iter()
                .copied()
                .filter(|&w| self.letter(other, w, crossing.index_in_other) != letter)
                .collect();

            for w in conflicting
            {
                self.state.domains[other].remove(&w);
                removals.push((other, w));
            }

            if self.state.domains[other].is_empty()
            {
                return (removals, true);
            }
        }

        (removals, false)
    }

    fn restore(&mut self, removals: Vec<(usize, u32)>)
    {
        for (slot, w) in removals
        {
            self.state.domains[slot].insert(w);
        }
    }
}

#[cfg(test)]
mod tests
{
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{fillin::{slots::extract_slots, template::Template}, settings::DictionarySettings};

    fn plus_slots() -> Vec<Slot>
    {
        extract_slots(&Template::parse(&["BWB", "WWW", "BWB"]).unwrap(), 3)
    }

    #[test]
    fn test_domains_restored_after_abort()
    {
        // both slots must share their middle letter, only ABC fits and it can be used once
        let dict = Dictionary::from_entries([("abc", "", 1), ("xyz", "", 1)], &DictionarySettings::default());
        let slots = plus_slots();
        let mut solver = Solver::new(&slots, &dict, 0, 30);
        let initial = solver.state().clone();

        let outcome = solver.solve(&mut StdRng::seed_from_u64(0));

        assert!(!outcome.solved);
        assert_eq!(outcome.backtracks, 1);
        assert_eq!(solver.state(), &initial);
    }

    #[test]
    fn test_exhausted_search_keeps_best_partial()
    {
        let dict = Dictionary::from_entries([("abc", "", 1), ("xyz", "", 1)], &DictionarySettings::default());
        let slots = plus_slots();
        let mut solver = Solver::new(&slots, &dict, 20_000, 30);
        let initial = solver.state().clone();

        let outcome = solver.solve(&mut StdRng::seed_from_u64(0));

        assert!(!outcome.solved);
        assert_eq!(outcome.best_filled, 1);
        assert_eq!(outcome.assignments.iter().flatten().count(), 1);
        assert_eq!(solver.state(), &initial);
    }

    #[test]
    fn test_solves_word_square()
    {
        // C A T
        // O R E
        // W E B
        let dict = Dictionary::from_entries(
            [("cat", "", 9), ("ore", "", 8), ("web", "", 7), ("cow", "", 6), ("are", "", 5), ("teb", "", 4), ("tab", "", 3), ("owe", "", 2)],
            &DictionarySettings::default(),
        );
        let slots = extract_slots(&Template::new(3, 3), 3);
        let mut solver = Solver::new(&slots, &dict, 20_000, 30);

        let outcome = solver.solve(&mut StdRng::seed_from_u64(1));

        assert!(outcome.solved);
        assert_eq!(outcome.best_filled, 6);
        let words: HashSet<&str> = outcome.assignments.iter().flatten().map(|w| w.as_str()).collect();
        assert_eq!(words.len(), 6);
        for (slot, word) in slots.iter().zip(&outcome.assignments)
        {
            let word = word.as_deref().unwrap();
            for c in &slot.crossings
            {
                let other = outcome.assignments[c.other_slot].as_deref().unwrap();
                assert_eq!(word.as_bytes()[c.index_in_slot], other.as_bytes()[c.index_in_other]);
            }
        }
    }

    #[test]
    fn test_mrv_prefers_smaller_domains()
    {
        let dict = Dictionary::from_entries([("abc", "", 1), ("xyz", "", 1), ("abcd", "", 1)], &DictionarySettings::default());
        let slots = extract_slots(&Template::parse(&["WWWB", "BBBB", "WWWW"]).unwrap(), 3);
        let solver = Solver::new(&slots, &dict, 10, 30);

        // the four letter slot has a single word
        assert_eq!(solver.select_slot(), Some(1));
    }

    #[test]
    fn test_mrv_ties_prefer_more_crossings()
    {
        // . . .
        // # . #
        // . . .
        let dict = Dictionary::from_entries([("abc", "", 1), ("xyz", "", 1)], &DictionarySettings::default());
        let slots = extract_slots(&Template::parse(&["WWW", "BWB", "WWW"]).unwrap(), 3);
        let solver = Solver::new(&slots, &dict, 10, 30);

        // equal domains, the down slot crosses both across slots
        assert_eq!(slots[2].crossings.len(), 2);
        assert_eq!(solver.select_slot(), Some(2));
    }
}
