use serde::{Deserialize, Serialize};

/// Represents the direction of a [word](crate::placed_word::PlacedWord) placed in a grid
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction
{
    #[default]
    Across,
    Down,
}

impl Direction
{
    pub fn opposite(&self) -> Direction
    {
        match *self
        {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Row and column step taken when moving one letter along this direction.
    pub fn delta(&self) -> (isize, isize)
    {
        match *self
        {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// Represents a word outside of a grid, together with its clue.
///
/// The word is always stored uppercase, see [normalize_word].
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
pub struct WordEntry
{
    pub word: String,
    pub definition: String,
}

impl WordEntry
{
    pub fn new(word: impl AsRef<str>, definition: impl Into<String>) -> WordEntry
    {
        WordEntry { word: word.as_ref().trim().to_uppercase(), definition: definition.into() }
    }

    pub fn len(&self) -> usize
    {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.word.is_empty()
    }

    /// True if the word consists only of the letters `A` to `Z`.
    pub fn is_playable(&self) -> bool
    {
        !self.word.is_empty() && self.word.bytes().all(|b| b.is_ascii_uppercase())
    }
}

/// Uppercases a word and strips surrounding whitespace.
///
/// Returns None if anything but ASCII letters remains.
///
/// ```
/// # use crossword_engine::word::normalize_word;
/// assert_eq!(normalize_word(" cat "), Some("CAT".to_owned()));
/// assert_eq!(normalize_word("ice-cream"), None);
/// ```
pub fn normalize_word(word: &str) -> Option<String>
{
    let word = word.trim().to_uppercase();
    (!word.is_empty() && word.bytes().all(|b| b.is_ascii_uppercase())).then_some(word)
}
