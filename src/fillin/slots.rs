use crate::word::Direction;

use super::template::Template;

/// A cell shared by two slots.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Crossing
{
    /// Offset of the shared cell within the owning slot.
    pub index_in_slot: usize,
    /// Index of the crossed slot in the slot list.
    pub other_slot: usize,
    /// Offset of the shared cell within the crossed slot.
    pub index_in_other: usize,
}

/// Represents one word-length variable of the fill-in puzzle: a maximal white run.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Slot
{
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
    pub crossings: Vec<Crossing>,
}

impl Slot
{
    /// Grid position of the `index`-th cell.
    pub fn cell(&self, index: usize) -> (usize, usize)
    {
        match self.direction
        {
            Direction::Across => (self.row, self.col + index),
            Direction::Down => (self.row + index, self.col),
        }
    }
}

/// Extracts every white run of at least `min_len` cells as a slot and wires up the crossings.
///
/// Across slots come first in reading order, then down slots column by column. Crossings are
/// recorded on both slots, so for every crossing `i -> j` there is a matching `j -> i` with the
/// offsets swapped.
///
/// # Example
/// ```
/// # use crossword_engine::fillin::{slots::extract_slots, template::Template};
/// //  # . #
/// //  . . .
/// //  # . #
/// let t = Template::parse(&["BWB", "WWW", "BWB"]).unwrap();
/// let slots = extract_slots(&t, 3);
///
/// assert_eq!(slots.len(), 2);
/// assert_eq!(slots[0].crossings[0].index_in_slot, 1);
/// assert_eq!(slots[1].crossings[0].other_slot, 0);
/// ```
pub fn extract_slots(template: &Template, min_len: usize) -> Vec<Slot>
{
    let width = template.width();
    let mut slots: Vec<Slot> = vec![];
    // (slot, offset) owning each cell, per direction
    let mut across_owner: Vec<Option<(usize, usize)>> = vec![None; width * template.height()];
    let mut down_owner = across_owner.clone();

    for direction in [Direction::Across, Direction::Down]
    {
        for run in template.runs(direction).into_iter().filter(|r| r.len >= min_len)
        {
            let (row, col) = run.cell(0);
            let id = slots.len();
            slots.push(Slot { row, col, direction, length: run.len, crossings: vec![] });

            let owners = match direction
            {
                Direction::Across => &mut across_owner,
                Direction::Down => &mut down_owner,
            };
            for i in 0..run.len
            {
                let (r, c) = run.cell(i);
                owners[r * width + c] = Some((id, i));
            }
        }
    }

    for (across, down) in across_owner.into_iter().zip(down_owner)
    {
        if let (Some((a, ai)), Some((d, di))) = (across, down)
        {
            slots[a].crossings.push(Crossing { index_in_slot: ai, other_slot: d, index_in_other: di });
            slots[d].crossings.push(Crossing { index_in_slot: di, other_slot: a, index_in_other: ai });
        }
    }

    slots
}

#[cfg(test)]
mod tests
{
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{fillin::template::generate_template, settings::FillinSettings};

    #[test]
    fn test_corner_template()
    {
        let t = Template::parse(&[
            "WWWBB",
            "WBBBB",
            "WBBBB",
            "BBBBB",
            "BBBBB",
        ]).unwrap();
        let slots = extract_slots(&t, 3);

        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].row, slots[0].col, slots[0].direction, slots[0].length), (0, 0, Direction::Across, 3));
        assert_eq!((slots[1].row, slots[1].col, slots[1].direction, slots[1].length), (0, 0, Direction::Down, 3));
        assert_eq!(slots[0].crossings, vec![Crossing { index_in_slot: 0, other_slot: 1, index_in_other: 0 }]);
        assert_eq!(slots[1].crossings, vec![Crossing { index_in_slot: 0, other_slot: 0, index_in_other: 0 }]);
    }

    #[test]
    fn test_plus_template()
    {
        let t = Template::parse(&["BWB", "WWW", "BWB"]).unwrap();
        let slots = extract_slots(&t, 3);

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.crossings.len() == 1));
        assert_eq!(slots[0].cell(1), (1, 1));
        assert_eq!(slots[1].cell(1), (1, 1));
    }

    #[test]
    fn test_short_runs_are_not_slots()
    {
        let t = Template::parse(&["WWBWWWW"]).unwrap();
        let slots = extract_slots(&t, 3);

        assert_eq!(slots.len(), 1);
        assert_eq!((slots[0].col, slots[0].length), (3, 4));
        assert!(slots[0].crossings.is_empty());
    }

    #[test]
    fn test_crossings_are_bidirectional()
    {
        let t = generate_template(&FillinSettings::default(), &mut StdRng::seed_from_u64(3));
        let slots = extract_slots(&t, 3);
        assert!(!slots.is_empty());

        for (i, slot) in slots.iter().enumerate()
        {
            for c in &slot.crossings
            {
                let other = &slots[c.other_slot];
                assert_ne!(other.direction, slot.direction);
                assert_eq!(slot.cell(c.index_in_slot), other.cell(c.index_in_other));
                assert!(other.crossings.contains(&Crossing { index_in_slot: c.index_in_other, other_slot: i, index_in_other: c.index_in_slot }));
            }
        }
    }
}
