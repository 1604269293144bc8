use std::collections::VecDeque;

use log::debug;
use rand::{seq::SliceRandom, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{settings::FillinSettings, word::Direction};

/// Error type for reading textual [templates](Template)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError
{
    #[error("The template has no cells.")]
    Empty,
    #[error("Row {row} has {found} cells, expected {expected}.")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("Unknown template cell {0:?}, expected W or . for white and B or # for black.")]
    UnknownCell(char),
}

/// A maximal run of white cells in one row or column.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Run
{
    pub direction: Direction,
    /// Row for across runs, column for down runs.
    pub line: usize,
    pub start: usize,
    pub len: usize,
}

impl Run
{
    /// Grid position of the `index`-th cell of the run.
    pub fn cell(&self, index: usize) -> (usize, usize)
    {
        match self.direction
        {
            Direction::Across => (self.line, self.start + index),
            Direction::Down => (self.start + index, self.line),
        }
    }
}

/// Black and white layout of a fill-in grid, `true` is a white (fillable) cell.
///
/// Generated templates are symmetric under 180 degree rotation, have no white run of length
/// 1 or 2, and their white cells form a single 4-connected region.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Template
{
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Template
{
    /// An all white template.
    pub fn new(width: usize, height: usize) -> Template
    {
        Template { width, height, cells: vec![true; width * height] }
    }

    /// Reads a template from text rows, `W` or `.` for white and `B` or `#` for black cells.
    ///
    /// ```
    /// # use crossword_engine::fillin::template::Template;
    /// let t = Template::parse(&["BWB", "WWW", "BWB"]).unwrap();
    /// assert_eq!(t.render(), "#.#\n...\n#.#");
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Template, TemplateError>
    {
        let width = rows.first().map_or(0, |r| r.chars().filter(|c| !c.is_whitespace()).count());
        if width == 0 { return Err(TemplateError::Empty); }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate()
        {
            let before = cells.len();
            for c in line.chars().filter(|c| !c.is_whitespace())
            {
                cells.push(match c
                {
                    'W' | 'w' | '.' => true,
                    'B' | 'b' | '#' => false,
                    other => return Err(TemplateError::UnknownCell(other)),
                });
            }
            if cells.len() - before != width
            {
                return Err(TemplateError::Ragged { row, expected: width, found: cells.len() - before });
            }
        }

        Ok(Template { width, height: rows.len(), cells })
    }

    pub fn render(&self) -> String
    {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|&white| if white { '.' } else { '#' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn width(&self) -> usize
    {
        self.width
    }

    pub fn height(&self) -> usize
    {
        self.height
    }

    pub fn is_white(&self, row: usize, col: usize) -> bool
    {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, white: bool)
    {
        self.cells[row * self.width + col] = white;
    }

    /// The cell a 180 degree rotation maps (`row`, `col`) onto.
    pub fn partner(&self, row: usize, col: usize) -> (usize, usize)
    {
        (self.height - 1 - row, self.width - 1 - col)
    }

    /// Colors a cell and its rotational partner.
    pub fn set_symmetric(&mut self, row: usize, col: usize, white: bool)
    {
        let (pr, pc) = self.partner(row, col);
        self.set(row, col, white);
        self.set(pr, pc, white);
    }

    pub fn white_count(&self) -> usize
    {
        self.cells.iter().filter(|&&w| w).count()
    }

    pub fn black_ratio(&self) -> f64
    {
        if self.cells.is_empty() { return 0.0; }
        (self.cells.len() - self.white_count()) as f64 / self.cells.len() as f64
    }

    pub fn is_symmetric(&self) -> bool
    {
        (0..self.height).all(|r| (0..self.width).all(|c|
        {
            let (pr, pc) = self.partner(r, c);
            self.is_white(r, c) == self.is_white(pr, pc)
        }))
    }

    /// Every maximal white run along `direction`.
    pub fn runs(&self, direction: Direction) -> Vec<Run>
    {
        let (lines, span) = match direction
        {
            Direction::Across => (self.height, self.width),
            Direction::Down => (self.width, self.height),
        };
        let white = |line: usize, i: usize| match direction
        {
            Direction::Across => self.is_white(line, i),
            Direction::Down => self.is_white(i, line),
        };

        let mut runs = vec![];
        for line in 0..lines
        {
            let mut i = 0;
            while i < span
            {
                if !white(line, i) { i += 1; continue; }

                let start = i;
                while i < span && white(line, i) { i += 1; }
                runs.push(Run { direction, line, start, len: i - start });
            }
        }
        runs
    }

    /// True if any white run, in either direction, is shorter than `min_len`.
    pub fn has_short_run(&self, min_len: usize) -> bool
    {
        [Direction::Across, Direction::Down].into_iter().any(|d| self.runs(d).iter().any(|r| r.len < min_len))
    }

    /// Runs longer than `max_len`.
    pub fn long_runs(&self, direction: Direction, max_len: usize) -> Vec<Run>
    {
        self.runs(direction).into_iter().filter(|r| r.len > max_len).collect()
    }

    /// True if every white cell can reach every other one through white neighbours.
    ///
    /// A template without white cells is not connected.
    pub fn is_connected(&self) -> bool
    {
        let Some(first) = self.cells.iter().position(|&w| w)
        else
        {
            return false;
        };

        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([first]);
        seen[first] = true;
        let mut reached = 1;

        while let Some(i) = queue.pop_front()
        {
            let (r, c) = (i / self.width, i % self.width);
            let neighbours = [
                (r > 0).then(|| i - self.width),
                (r + 1 < self.height).then(|| i + self.width),
                (c > 0).then(|| i - 1),
                (c + 1 < self.width).then(|| i + 1),
            ];
            for n in neighbours.into_iter().flatten()
            {
                if self.cells[n] && !seen[n]
                {
                    seen[n] = true;
                    reached += 1;
                    queue.push_back(n);
                }
            }
        }

        reached == self.white_count()
    }

    /// Blackens a white cell and its partner unless that breaks the template invariants.
    ///
    /// Returns true if the change was kept.
    pub fn try_blacken(&mut self, row: usize, col: usize, min_len: usize) -> bool
    {
        if !self.is_white(row, col) { return false; }

        self.set_symmetric(row, col, false);
        if self.has_short_run(min_len) || !self.is_connected()
        {
            self.set_symmetric(row, col, true);
            return false;
        }
        true
    }
}

/// Builds a random symmetric template.
///
/// First runs longer than [max_run_length](FillinSettings::max_run_length) are broken by black
/// cells placed at least [min_slot_length](FillinSettings::min_slot_length) cells from either
/// end, then extra black cells are scattered over the interior until
/// [target_black_ratio](FillinSettings::target_black_ratio) is reached. Every change that would
/// leave a short run or split the white region is undone, so some long runs may survive.
pub fn generate_template(settings: &FillinSettings, rng: &mut dyn RngCore) -> Template
{
    let mut template = Template::new(settings.width, settings.height);
    let min_len = settings.min_slot_length;

    for pass in 0..settings.break_passes
    {
        let mut changed = false;

        for direction in [Direction::Across, Direction::Down]
        {
            for run in template.long_runs(direction, settings.max_run_length)
            {
                // an earlier break in this pass may already have split it
                if !(0..run.len).all(|i| { let (r, c) = run.cell(i); template.is_white(r, c) }) { continue; }

                let mut offsets: Vec<usize> = (min_len..run.len.saturating_sub(min_len)).collect();
                offsets.shuffle(rng);
                for offset in offsets
                {
                    let (r, c) = run.cell(offset);
                    if template.try_blacken(r, c, min_len)
                    {
                        changed = true;
                        break;
                    }
                }
            }
        }

        if !changed
        {
            debug!("run breaking settled after {} passes", pass + 1);
            break;
        }
    }

    if settings.width > 2 && settings.height > 2
    {
        let mut interior: Vec<(usize, usize)> = (1..settings.height - 1)
            .flat_map(|r| (1..settings.width - 1).map(move |c| (r, c)))
            .collect();
        interior.shuffle(rng);

        for (r, c) in interior
        {
            if template.black_ratio() >= settings.target_black_ratio { break; }
            template.try_blacken(r, c, min_len);
        }
    }

    let leftover = template.long_runs(Direction::Across, settings.max_run_length).len() + template.long_runs(Direction::Down, settings.max_run_length).len();
    debug!("template {}x{}: {:.0}% black, {} long runs left", settings.width, settings.height, template.black_ratio() * 100.0, leftover);
    template
}

#[cfg(test)]
mod tests
{
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_parse_errors()
    {
        assert_eq!(Template::parse(&[]), Err(TemplateError::Empty));
        assert_eq!(Template::parse(&["WWW", "WW"]), Err(TemplateError::Ragged { row: 1, expected: 3, found: 2 }));
        assert_eq!(Template::parse(&["WXW"]), Err(TemplateError::UnknownCell('X')));
    }

    #[test]
    fn test_runs_and_checks()
    {
        let t = Template::parse(&[
            "WWWBB",
            "WBBBB",
            "WBBBB",
            "BBBBB",
            "BBBBB",
        ]).unwrap();

        assert_eq!(t.runs(Direction::Across).iter().map(|r| r.len).collect::<Vec<_>>(), vec![3, 1, 1]);
        let down = t.runs(Direction::Down);
        assert_eq!(down.iter().map(|r| r.len).collect::<Vec<_>>(), vec![3, 1, 1]);
        assert_eq!(down[0], Run { direction: Direction::Down, line: 0, start: 0, len: 3 });
        assert_eq!(down[0].cell(2), (2, 0));
        assert!(t.has_short_run(3));
        assert!(t.is_connected());
        assert!(!t.is_symmetric());

        let split = Template::parse(&["WWWBWWW"]).unwrap();
        assert!(!split.is_connected());
        assert!(split.is_symmetric());
        assert!(!Template::parse(&["BB"]).unwrap().is_connected());
    }

    #[test]
    fn test_try_blacken_reverts_invalid_changes()
    {
        let mut t = Template::new(7, 7);
        // (0, 1) would leave a one cell run in the first row
        assert!(!t.try_blacken(0, 1, 3));
        assert_eq!(t, Template::new(7, 7));

        assert!(t.try_blacken(0, 3, 3));
        assert!(!t.is_white(0, 3));
        assert!(!t.is_white(6, 3));
    }

    #[test]
    fn test_generated_templates_keep_invariants()
    {
        let settings = FillinSettings::default();

        for seed in 0..8
        {
            let t = generate_template(&settings, &mut StdRng::seed_from_u64(seed));

            assert_eq!((t.width(), t.height()), (13, 13));
            assert!(t.is_symmetric(), "not symmetric:\n{}", t.render());
            assert!(!t.has_short_run(3), "short run:\n{}", t.render());
            assert!(t.is_connected(), "split:\n{}", t.render());
            assert!(t.black_ratio() > 0.0);
        }
    }

    #[test]
    fn test_run_breaks_keep_run_ends_white()
    {
        // no scatter phase, only run breaking
        let settings = FillinSettings { target_black_ratio: 0.0, ..Default::default() };
        let inner = settings.min_slot_length..=settings.width - 1 - settings.min_slot_length;
        let full_runs = settings.width + settings.height;

        for seed in 0..6
        {
            let t = generate_template(&settings, &mut StdRng::seed_from_u64(seed));
            let long = t.long_runs(Direction::Across, settings.max_run_length).len() + t.long_runs(Direction::Down, settings.max_run_length).len();

            assert!(t.black_ratio() > 0.0);
            assert!(long < full_runs, "nothing broken:\n{}", t.render());
            for r in 0..t.height()
            {
                for c in 0..t.width()
                {
                    if !t.is_white(r, c)
                    {
                        assert!(inner.contains(&c) || inner.contains(&r), "break at ({}, {}) too close to a run end:\n{}", r, c, t.render());
                    }
                }
            }
        }
    }

    #[test]
    fn test_small_templates_stay_white()
    {
        let settings = FillinSettings { width: 3, height: 3, ..Default::default() };
        let t = generate_template(&settings, &mut StdRng::seed_from_u64(0));
        assert_eq!(t, Template::new(3, 3));
    }
}
