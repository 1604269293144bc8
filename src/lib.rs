pub mod utils;
pub mod word;
pub mod dictionary;
pub mod settings;
pub mod grid;
pub mod placed_word;
pub mod placement;
pub mod strategy;
pub mod crossword;
pub mod fillin;
pub mod generator;

use rand::RngCore;

use crate::{crossword::CrosswordData, dictionary::Dictionary, settings::GeneratorSettings, strategy::Algorithm, utils::ProgressReporter, word::WordEntry};

/// Generates a puzzle with the chosen algorithm, the single dispatch for every engine.
///
/// The classic algorithms place as many of `words` as they can and leave the rest out,
/// [Algorithm::Fillin] ignores `words` and fills a template from `dict`. The result is always
/// structurally valid.
///
/// # Example
/// ```
/// use crossword_engine::{dictionary::Dictionary, generate, settings::GeneratorSettings, strategy::Algorithm, utils::ProgressReporter, word::WordEntry};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let words: Vec<WordEntry> = ["cat", "car", "art"].iter().map(|w| WordEntry::new(w, "")).collect();
/// let dict = Dictionary::default();
///
/// let cw = generate(&words, Algorithm::Original, &dict, &GeneratorSettings::default(), &mut StdRng::seed_from_u64(1), &mut ProgressReporter::silent());
///
/// assert!(cw.validate().is_ok());
/// assert!(cw.words.len() >= 2);
/// assert_eq!(cw.words[0].clue_number, Some(1));
/// ```
pub fn generate<R: RngCore>(words: &[WordEntry], algorithm: Algorithm, dict: &Dictionary, settings: &GeneratorSettings, rng: &mut R, progress: &mut ProgressReporter) -> CrosswordData
{
    log::debug!("generating with {} from {} words and {} dictionary entries", algorithm, words.len(), dict.len());
    algorithm.strategy(settings).generate(words, dict, rng, progress)
}

/// Builds a classic crossword out of `words`, same as [generate].
pub fn generate_crossword<R: RngCore>(words: &[WordEntry], algorithm: Algorithm, dict: &Dictionary, settings: &GeneratorSettings, rng: &mut R, progress: &mut ProgressReporter) -> CrosswordData
{
    generate(words, algorithm, dict, settings, rng, progress)
}

/// Builds a fill-in puzzle from the dictionary alone.
pub fn generate_fillin_smart<R: RngCore>(dict: &Dictionary, settings: &GeneratorSettings, rng: &mut R, progress: &mut ProgressReporter) -> CrosswordData
{
    generate(&[], Algorithm::Fillin, dict, settings, rng, progress)
}
