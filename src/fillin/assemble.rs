use crate::{
    crossword::{assign_clue_numbers, average_playability, CrosswordData, PuzzleType},
    dictionary::Dictionary,
    placed_word::PlacedWord,
    word::WordEntry,
};

use super::{slots::Slot, template::Template};

/// Writes the assigned words into a grid the size of the template.
///
/// White cells no word covers end up black (None), clue numbers are assigned like for the
/// classic puzzles and definitions come from the dictionary. Without any assigned slot the
/// result is the empty crossword.
///
/// An unfilled slot keeps the letters its filled crossing slots wrote into it, so such a run
/// can show letters without being an entry of its own.
pub fn assemble(template: &Template, slots: &[Slot], assignments: &[Option<String>], dict: &Dictionary) -> CrosswordData
{
    if assignments.iter().all(Option::is_none)
    {
        return CrosswordData::empty(PuzzleType::Fillin);
    }

    let mut grid = vec![vec![None; template.width()]; template.height()];
    let mut words = vec![];

    for (slot, word) in slots.iter().zip(assignments)
    {
        let Some(word) = word else { continue };
        assert_eq!(word.len(), slot.length, "{} does not fit a slot of {}", word, slot.length);

        for (i, letter) in word.chars().enumerate()
        {
            let (r, c) = slot.cell(i);
            grid[r][c] = Some(letter);
        }

        let entry = WordEntry::new(word, dict.definition(word).unwrap_or_default());
        words.push(PlacedWord::new(&entry, slot.row, slot.col, slot.direction));
    }

    assign_clue_numbers(&mut words);

    CrosswordData
    {
        grid,
        width: template.width(),
        height: template.height(),
        avg_playability: Some(average_playability(&words, dict)),
        puzzle_type: Some(PuzzleType::Fillin),
        words,
    }
}
