use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for reading [settings](GeneratorSettings)
#[derive(Error, Debug)]
pub enum SettingsError
{
    #[error("Cannot parse generator settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for building the [dictionary index](crate::dictionary::Dictionary).
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionarySettings
{
    /// How many words of one length are kept, best playability first.
    pub max_words_per_length: usize,
}

impl Default for DictionarySettings
{
    fn default() -> Self
    {
        DictionarySettings { max_words_per_length: 3000 }
    }
}

/// Settings for the classic placement strategies.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosswordSettings
{
    /// Extra passes over words that could not be placed on the first pass.
    pub retry_passes: usize,
    /// Number of complete attempts made by the `smart` strategy.
    pub smart_attempts: usize,
    /// Minimum playability for words the `smart` strategy adds on its own while filling gaps.
    pub smart_playability_floor: u32,
}

impl Default for CrosswordSettings
{
    fn default() -> Self
    {
        CrosswordSettings { retry_passes: 3, smart_attempts: 5, smart_playability_floor: 25 }
    }
}

/// Settings for the fill-in engine.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FillinSettings
{
    pub width: usize,
    pub height: usize,
    /// Runs longer than this are broken up by black cells when possible.
    pub max_run_length: usize,
    /// Shortest white run allowed in a template, and shortest slot.
    pub min_slot_length: usize,
    pub break_passes: usize,
    pub target_black_ratio: f64,
    /// Independent template + solve cycles.
    pub attempts: usize,
    /// Solver runs per template.
    pub restarts_per_template: usize,
    pub backtrack_limit: usize,
    /// How many of the best candidates get shuffled before being tried.
    pub shuffle_window: usize,
}

impl Default for FillinSettings
{
    fn default() -> Self
    {
        FillinSettings
        {
            width: 13,
            height: 13,
            max_run_length: 8,
            min_slot_length: 3,
            break_passes: 20,
            target_black_ratio: 0.18,
            attempts: 6,
            restarts_per_template: 2,
            backtrack_limit: 20_000,
            shuffle_window: 30,
        }
    }
}

/// Represents all settings for the generation engines.
///
/// # Example
/// ```
/// # use crossword_engine::settings::GeneratorSettings;
/// let settings = GeneratorSettings::from_json(r#"{ "seed": 7, "fillin": { "attempts": 2 } }"#).unwrap();
///
/// assert_eq!(settings.seed, Some(7));
/// assert_eq!(settings.fillin.attempts, 2);
/// assert_eq!(settings.fillin.width, 13);
/// ```
#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings
{
    /// Makes every random choice reproducible when set.
    pub seed: Option<u64>,
    pub dictionary: DictionarySettings,
    pub crossword: CrosswordSettings,
    pub fillin: FillinSettings,
}

impl GeneratorSettings
{
    pub fn from_json(json: &str) -> Result<GeneratorSettings, SettingsError>
    {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError>
    {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_settings_json_roundtrip_keeps_overrides()
    {
        let mut settings = GeneratorSettings::default();
        settings.crossword.smart_attempts = 9;
        settings.fillin.backtrack_limit = 10;

        let json = settings.to_json().unwrap();
        assert_eq!(GeneratorSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_settings_reject_malformed_json()
    {
        assert!(matches!(GeneratorSettings::from_json("{ seed: "), Err(SettingsError::Parse(_))));
    }
}
