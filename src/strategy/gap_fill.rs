use log::debug;

use crate::{
    placement::{base_score, check_placement, Placement},
    word::{Direction, WordEntry},
};

use super::board::Board;

/// Limits for [fill_gaps].
#[derive(Clone, Copy, Debug)]
pub struct GapFill
{
    /// Filler words must score at least this.
    pub playability_floor: u32,
    pub min_len: usize,
    /// Letters already on the grid a gap needs before it is worth filling.
    pub min_known: usize,
    pub max_passes: usize,
}

impl Default for GapFill
{
    fn default() -> Self
    {
        GapFill { playability_floor: 0, min_len: 3, min_known: 2, max_passes: 2 }
    }
}

/// Adds dictionary words into empty runs inside the current bounding box.
///
/// Every row and column segment of the bounding box that already crosses at least
/// [min_known](GapFill::min_known) letters is matched against dictionary words of its length,
/// the first word that fits the known letters and passes the usual placement checks is placed.
/// Segments run up to the far edge of the bounding box and longer ones are tried first. Returns
/// how many words were added.
pub fn fill_gaps(board: &mut Board, options: &GapFill) -> usize
{
    let mut added = 0;

    for _ in 0..options.max_passes
    {
        let added_before = added;
        for direction in [Direction::Across, Direction::Down]
        {
            added += fill_direction(board, options, direction);
        }
        if added == added_before { break; }
    }

    debug!("gap filling added {} words", added);
    added
}

fn fill_direction(board: &mut Board, options: &GapFill, direction: Direction) -> usize
{
    let bbox = board.bounding_box();
    if bbox.is_empty() { return 0; }

    let (lines, line_start, span, span_start) = match direction
    {
        Direction::Across => (bbox.height, bbox.row, bbox.width, bbox.col),
        Direction::Down => (bbox.width, bbox.col, bbox.height, bbox.row),
    };

    let mut added = 0;
    for line in line_start..line_start + lines
    {
        let mut start = span_start;
        while start < span_start + span
        {
            let mut step = 1;
            for len in (options.min_len..=span_start + span - start).rev()
            {
                let (row, col) = match direction
                {
                    Direction::Across => (line, start),
                    Direction::Down => (start, line),
                };
                if let Some(entry) = find_filler(board, options, row, col, direction, len)
                {
                    let intersections = check_placement(&board.grid, &board.placed, &entry.word, row as isize, col as isize, direction, board.dictionary()).unwrap_or(0);
                    let score = base_score(&board.grid, &entry.word, row, col, direction, intersections, board.dictionary());
                    board.place(&entry, &Placement { row, col, direction, intersections, score });
                    added += 1;
                    step = len;
                    break;
                }
            }
            start += step;
        }
    }

    added
}

/// Known letters of the segment, None if the segment has too few of them or no gap at all.
fn segment_pattern(board: &Board, options: &GapFill, row: usize, col: usize, direction: Direction, len: usize) -> Option<Vec<Option<u8>>>
{
    let (dr, dc) = direction.delta();
    let (row, col) = (row as isize, col as isize);

    if !board.grid.is_vacant(row - dr, col - dc) { return None; }

    let pattern: Vec<Option<u8>> = (0..len as isize).map(|i| board.grid.letter_at(row + dr * i, col + dc * i)).collect();
    let known = pattern.iter().filter(|l| l.is_some()).count();

    (known >= options.min_known && known < len).then_some(pattern)
}

fn find_filler(board: &Board, options: &GapFill, row: usize, col: usize, direction: Direction, len: usize) -> Option<WordEntry>
{
    let pattern = segment_pattern(board, options, row, col, direction, len)?;
    let dict = board.dictionary();

    dict.words_of_length(len)
        .iter()
        .take_while(|w| dict.playability(w) >= options.playability_floor)
        .filter(|w| !board.contains(w))
        .filter(|w| w.bytes().zip(pattern.iter()).all(|(l, p)| p.map_or(true, |p| p == l)))
        .find(|w| check_placement(&board.grid, &board.placed, w, row as isize, col as isize, direction, dict).is_some())
        .map(|w| WordEntry::new(w, dict.definition(w).unwrap_or_default()))
}
