use std::{collections::HashMap, sync::{Arc, OnceLock}};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{settings::DictionarySettings, word::{normalize_word, WordEntry}};

/// Error type for loading word lists
#[derive(Error, Debug)]
pub enum DictionaryError
{
    #[error("Cannot parse the word list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Data source the [dictionary](Dictionary) is built from.
///
/// Implementations are expected to be static for the lifetime of the process, the index is built once.
pub trait WordSource
{
    /// Every word with its definition.
    fn parse_wordlist(&self) -> Vec<WordEntry>;

    /// Popularity weight of a word, 0 if the word is not in the playability list.
    fn playability_score(&self, word: &str) -> u32;
}

/// One line of a word list: word, definition and playability score.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct WordRecord(pub String, pub String, pub u32);

/// A [word source](WordSource) kept in memory.
///
/// # Example
/// ```
/// # use crossword_engine::dictionary::{MemoryWordSource, WordSource};
/// let source = MemoryWordSource::from_json(r#"[["cat", "A small feline", 80], ["dog", "A loyal pet", 75]]"#).unwrap();
///
/// assert_eq!(source.parse_wordlist().len(), 2);
/// assert_eq!(source.playability_score("CAT"), 80);
/// assert_eq!(source.playability_score("COW"), 0);
/// ```
#[derive(Clone, Default, Debug)]
pub struct MemoryWordSource
{
    records: Vec<WordRecord>,
    scores: HashMap<String, u32>,
}

impl MemoryWordSource
{
    pub fn new<W: AsRef<str>, D: Into<String>>(records: impl IntoIterator<Item = (W, D, u32)>) -> MemoryWordSource
    {
        let records: Vec<WordRecord> = records
            .into_iter()
            .map(|(w, d, s)| WordRecord(w.as_ref().trim().to_uppercase(), d.into(), s))
            .collect();
        let scores = records.iter().map(|r| (r.0.clone(), r.2)).collect();

        MemoryWordSource { records, scores }
    }

    /// Reads a JSON array of `[word, definition, playability]` triples.
    pub fn from_json(json: &str) -> Result<MemoryWordSource, DictionaryError>
    {
        let records: Vec<WordRecord> = serde_json::from_str(json)?;
        Ok(MemoryWordSource::new(records.into_iter().map(|r| (r.0, r.1, r.2))))
    }
}

impl WordSource for MemoryWordSource
{
    fn parse_wordlist(&self) -> Vec<WordEntry>
    {
        self.records.iter().map(|r| WordEntry::new(&r.0, r.1.clone())).collect()
    }

    fn playability_score(&self, word: &str) -> u32
    {
        self.scores.get(word).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
struct IndexedWord
{
    definition: String,
    playability: u32,
}

/// Word index shared by both engines.
///
/// Membership and playability lookups are O(1). Words of a given length are kept sorted by
/// descending playability (ties alphabetically) and capped at
/// [max_words_per_length](DictionarySettings::max_words_per_length).
///
/// The index is immutable once built, so it can be shared between threads behind an [Arc].
#[derive(Clone, Default, Debug)]
pub struct Dictionary
{
    words: HashMap<String, IndexedWord>,
    by_length: HashMap<usize, Vec<String>>,
}

impl Dictionary
{
    pub fn from_source(source: &impl WordSource, settings: &DictionarySettings) -> Dictionary
    {
        let entries = source.parse_wordlist();
        Dictionary::from_entries(entries.into_iter().map(|e|
        {
            let score = source.playability_score(&e.word);
            (e.word, e.definition, score)
        }), settings)
    }

    /// Builds the index from `(word, definition, playability)` triples.
    ///
    /// Words that are not purely alphabetic are skipped. For repeated words the first definition
    /// and the highest playability win.
    pub fn from_entries<W: AsRef<str>, D: Into<String>>(entries: impl IntoIterator<Item = (W, D, u32)>, settings: &DictionarySettings) -> Dictionary
    {
        let mut words: HashMap<String, IndexedWord> = HashMap::new();
        let mut skipped = 0usize;

        for (word, definition, playability) in entries
        {
            let Some(word) = normalize_word(word.as_ref())
            else
            {
                skipped += 1;
                continue;
            };

            words
                .entry(word)
                .and_modify(|w| w.playability = w.playability.max(playability))
                .or_insert(IndexedWord { definition: definition.into(), playability });
        }

        let mut by_length: HashMap<usize, Vec<String>> = HashMap::new();
        for word in words.keys()
        {
            by_length.entry(word.len()).or_default().push(word.clone());
        }
        for bucket in by_length.values_mut()
        {
            bucket.sort_by(|a, b| words[b].playability.cmp(&words[a].playability).then_with(|| a.cmp(b)));
            bucket.truncate(settings.max_words_per_length);
        }

        debug!("dictionary built: {} words, {} lengths, {} skipped", words.len(), by_length.len(), skipped);

        Dictionary { words, by_length }
    }

    pub fn is_valid_word(&self, word: &str) -> bool
    {
        self.words.contains_key(word)
    }

    /// Playability score of the word, 0 if unknown.
    pub fn playability(&self, word: &str) -> u32
    {
        self.words.get(word).map_or(0, |w| w.playability)
    }

    pub fn definition(&self, word: &str) -> Option<&str>
    {
        self.words.get(word).map(|w| w.definition.as_str())
    }

    /// Words of length `len`, best playability first.
    pub fn words_of_length(&self, len: usize) -> &[String]
    {
        self.by_length.get(&len).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize
    {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.words.is_empty()
    }
}

/// Process wide, lazily built [dictionary](Dictionary).
///
/// The first call to [get_or_build](DictionaryCache::get_or_build) builds the index, every later
/// call returns the same [Arc] regardless of the source it is given.
#[derive(Default)]
pub struct DictionaryCache
{
    cell: OnceLock<Arc<Dictionary>>,
}

impl DictionaryCache
{
    pub const fn new() -> DictionaryCache
    {
        DictionaryCache { cell: OnceLock::new() }
    }

    pub fn get_or_build(&self, source: &impl WordSource, settings: &DictionarySettings) -> Arc<Dictionary>
    {
        self.cell.get_or_init(|| Arc::new(Dictionary::from_source(source, settings))).clone()
    }

    pub fn get(&self) -> Option<Arc<Dictionary>>
    {
        self.cell.get().cloned()
    }
}
