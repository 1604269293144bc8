//! The classic crossword placement strategies.
//!
//! Every strategy follows the same skeleton: words are sorted longest first, the longest one is
//! laid across the middle of an oversized working grid, the rest are placed one by one where they
//! cross what is already there, and words that did not fit are retried for a few more passes.
//! Strategies differ in grid size, how they score candidate placements, and what they do
//! afterwards.

pub mod board;
pub mod gap_fill;

mod compact;
mod dense;
mod fitted;
mod original;
mod smart;

use std::{fmt, str::FromStr};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{crossword::CrosswordData, dictionary::Dictionary, fillin::Fillin, settings::GeneratorSettings, utils::ProgressReporter, word::WordEntry};

pub use compact::Compact;
pub use dense::Dense;
pub use fitted::Fitted;
pub use original::Original;
pub use smart::Smart;

/// A full grid construction policy.
pub trait PlacementStrategy
{
    /// Builds a crossword from as many of `words` as can be placed.
    ///
    /// Words that cannot be placed are left out, an empty word list gives the empty crossword.
    /// The fill-in generator draws from `dict` alone and ignores `words`.
    fn generate(&self, words: &[WordEntry], dict: &Dictionary, rng: &mut dyn RngCore, progress: &mut ProgressReporter) -> CrosswordData;
}

/// Error type for unknown [algorithm](Algorithm) names
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown algorithm {0:?}, expected one of original, compact, dense, fitted, smart, fillin.")]
pub struct AlgorithmParseError(pub String);

/// Selects one of the generation strategies.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm
{
    /// 80x80 working grid, scores only intersections and centering.
    Original,
    /// 50x50 working grid, prefers dense placements that barely grow the bounding box.
    Compact,
    /// 40x40 working grid, seeds a cluster of letter-sharing words and demands multiple crossings.
    Dense,
    /// 30x30 working grid, keeps words inside the current bounds and fills gaps from the dictionary.
    Fitted,
    /// Several shuffled attempts of a fitted style build, keeping the best.
    #[default]
    Smart,
    /// Fills a random symmetric template from the dictionary, without a word list.
    Fillin,
}

impl Algorithm
{
    pub const ALL: [Algorithm; 6] = [Algorithm::Original, Algorithm::Compact, Algorithm::Dense, Algorithm::Fitted, Algorithm::Smart, Algorithm::Fillin];

    /// The algorithms that build a crossword out of a word list.
    pub const CLASSIC: [Algorithm; 5] = [Algorithm::Original, Algorithm::Compact, Algorithm::Dense, Algorithm::Fitted, Algorithm::Smart];

    pub fn name(&self) -> &'static str
    {
        match *self
        {
            Algorithm::Original => "original",
            Algorithm::Compact => "compact",
            Algorithm::Dense => "dense",
            Algorithm::Fitted => "fitted",
            Algorithm::Smart => "smart",
            Algorithm::Fillin => "fillin",
        }
    }

    /// The strategy implementing this algorithm.
    pub fn strategy(&self, settings: &GeneratorSettings) -> Box<dyn PlacementStrategy>
    {
        let crossword = &settings.crossword;
        match *self
        {
            Algorithm::Original => Box::new(Original { retry_passes: crossword.retry_passes }),
            Algorithm::Compact => Box::new(Compact { retry_passes: crossword.retry_passes }),
            Algorithm::Dense => Box::new(Dense { retry_passes: crossword.retry_passes }),
            Algorithm::Fitted => Box::new(Fitted { retry_passes: crossword.retry_passes }),
            Algorithm::Smart => Box::new(Smart
            {
                retry_passes: crossword.retry_passes,
                attempts: crossword.smart_attempts,
                playability_floor: crossword.smart_playability_floor,
            }),
            Algorithm::Fillin => Box::new(Fillin { settings: settings.fillin.clone() }),
        }
    }
}

impl fmt::Display for Algorithm
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm
{
    type Err = AlgorithmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AlgorithmParseError(s.to_owned()))
    }
}
