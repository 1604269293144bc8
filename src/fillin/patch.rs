use std::collections::HashSet;

use log::debug;

use crate::dictionary::Dictionary;

use super::slots::Slot;

/// Letters of `slot` already fixed by assigned crossing slots.
fn known_letters(slot: &Slot, assignments: &[Option<String>]) -> Vec<Option<u8>>
{
    let mut pattern = vec![None; slot.length];
    for c in &slot.crossings
    {
        if let Some(other) = &assignments[c.other_slot]
        {
            pattern[c.index_in_slot] = Some(other.as_bytes()[c.index_in_other]);
        }
    }
    pattern
}

/// Fills what is left of a partial assignment without backtracking.
///
/// Repeatedly takes the unfilled slots with the most fixed crossing letters first and gives the
/// first of them that can be filled the most playable unused word matching those letters. Stops
/// once nothing more can be filled. Returns the number of newly filled slots.
pub fn greedy_patch(slots: &[Slot], assignments: &mut [Option<String>], dict: &Dictionary) -> usize
{
    let mut filled = 0;

    loop
    {
        let used: HashSet<String> = assignments.iter().flatten().cloned().collect();

        let mut open: Vec<(usize, Vec<Option<u8>>)> = slots
            .iter()
            .enumerate()
            .filter(|(i, _)| assignments[*i].is_none())
            .map(|(i, slot)| (i, known_letters(slot, assignments)))
            .collect();
        open.sort_by_key(|(_, pattern)| std::cmp::Reverse(pattern.iter().flatten().count()));

        let found = open.into_iter().find_map(|(i, pattern)|
        {
            dict.words_of_length(slots[i].length)
                .iter()
                .find(|w| !used.contains(*w) && w.bytes().zip(&pattern).all(|(b, p)| p.map_or(true, |p| p == b)))
                .map(|w| (i, w.clone()))
        });

        match found
        {
            Some((i, word)) =>
            {
                assignments[i] = Some(word);
                filled += 1;
            }
            None => break,
        }
    }

    debug!("greedy patch filled {} slots", filled);
    filled
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{fillin::{slots::extract_slots, template::Template}, settings::DictionarySettings};

    #[test]
    fn test_fills_consistent_words()
    {
        let dict = Dictionary::from_entries([("abc", "", 5), ("xyz", "", 9), ("dbe", "", 1)], &DictionarySettings::default());
        let slots = extract_slots(&Template::parse(&["BWB", "WWW", "BWB"]).unwrap(), 3);
        let mut assignments = vec![Some("ABC".to_owned()), None];

        assert_eq!(greedy_patch(&slots, &mut assignments, &dict), 1);
        // XYZ is more playable but does not have B in the middle
        assert_eq!(assignments[1].as_deref(), Some("DBE"));
    }

    #[test]
    fn test_leaves_impossible_slots_empty()
    {
        let dict = Dictionary::from_entries([("abc", "", 5), ("xyz", "", 9)], &DictionarySettings::default());
        let slots = extract_slots(&Template::parse(&["BWB", "WWW", "BWB"]).unwrap(), 3);
        let mut assignments = vec![Some("ABC".to_owned()), None];

        assert_eq!(greedy_patch(&slots, &mut assignments, &dict), 0);
        assert_eq!(assignments[1], None);
    }

    #[test]
    fn test_most_constrained_slot_goes_first()
    {
        // A B C
        // . . .
        // G H I
        let dict = Dictionary::from_entries([("axg", "", 5)], &DictionarySettings::default());
        let slots = extract_slots(&Template::new(3, 3), 3);
        let mut assignments = vec![Some("ABC".to_owned()), None, Some("GHI".to_owned()), None, None, None];

        // the middle row fits AXG too, but the first column already knows two letters
        assert_eq!(greedy_patch(&slots, &mut assignments, &dict), 1);
        assert_eq!(assignments[3].as_deref(), Some("AXG"));
        assert_eq!(assignments[1], None);
    }

    #[test]
    fn test_fills_from_scratch_without_repeats()
    {
        let dict = Dictionary::from_entries([("abc", "", 5), ("xbz", "", 9)], &DictionarySettings::default());
        let slots = extract_slots(&Template::parse(&["BWB", "WWW", "BWB"]).unwrap(), 3);
        let mut assignments = vec![None, None];

        assert_eq!(greedy_patch(&slots, &mut assignments, &dict), 2);
        assert_eq!(assignments, vec![Some("XBZ".to_owned()), Some("ABC".to_owned())]);
    }
}
