use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::error::{AnalyzerError, Result};

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub ranking: RankingConfig,
    pub normalizer: NormalizerConfig,
    pub segmentation: SegmentationConfig,
    pub words: WordsConfig,
    pub input: InputConfig,
    pub lexicon: LexiconConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RankingConfig {
    /// Terms reported per document
    pub top_k: usize,
    /// Terms reported for the combined papers
    pub pooled_top_k: usize,
    /// Vocabulary cap for one vectorizer fit
    pub max_features: usize,
    pub mode: RankingMode,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            pooled_top_k: 15,
            max_features: 5000,
            mode: RankingMode::Unigram,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    Unigram, // single words
    Phrases, // contiguous 2-3 word n-grams
}

impl RankingMode {
    /// Inclusive n-gram span for this mode.
    pub fn ngram_range(self) -> (usize, usize) {
        match self {
            RankingMode::Unigram => (1, 1),
            RankingMode::Phrases => (2, 3),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct NormalizerConfig {
    pub punctuation: PunctuationPolicy,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationPolicy {
    /// Keep only `[a-z]` and whitespace.
    #[default]
    LettersOnly,
    /// Strip the ASCII punctuation set; digits and other letters survive.
    AsciiPunctuation,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SegmentationConfig {
    pub enabled: bool,
    pub min_question_chars: usize,
    pub boilerplate_markers: Vec<String>,
    pub no_marker_fallback: NoMarkerFallback,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_question_chars: 30,
            boilerplate_markers: vec![
                "examination paper".to_string(),
                "instructions to candidates".to_string(),
                "do not turn over".to_string(),
            ],
            no_marker_fallback: NoMarkerFallback::WholeDocument,
        }
    }
}

/// What to do with a document that has no question numbering at all.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoMarkerFallback {
    /// Treat the whole text as one candidate question (still filtered).
    #[default]
    WholeDocument,
    /// Produce no questions.
    Discard,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WordsConfig {
    pub top_words: usize,
    pub pooled_top_words: usize,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            top_words: 10,
            pooled_top_words: 15,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub max_file_size_mb: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
        }
    }
}

/// Optional overrides for the shipped word lists and category table.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct LexiconConfig {
    pub stopwords_path: Option<PathBuf>,
    pub domain_noise_path: Option<PathBuf>,
    pub categories_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path` (or [`DEFAULT_SETTINGS_PATH`]) and the
    /// environment.
    ///
    /// An explicitly given file must exist; the default one is optional.
    /// Environment variables use the `APP` prefix and `__` as separator,
    /// e.g. `APP__RANKING__TOP_K=20`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let (name, required) = match path {
            Some(p) => (p.to_string_lossy().to_string(), true),
            None => (DEFAULT_SETTINGS_PATH.to_string(), false),
        };

        let config = Config::builder()
            .add_source(File::with_name(&name).required(required))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_k == 0 || self.ranking.pooled_top_k == 0 {
            return Err(AnalyzerError::ConfigError(
                "ranking.top_k and ranking.pooled_top_k must be at least 1".to_string(),
            ));
        }

        if self.ranking.max_features == 0 {
            return Err(AnalyzerError::ConfigError(
                "ranking.max_features must be at least 1".to_string(),
            ));
        }

        if self.words.top_words == 0 || self.words.pooled_top_words == 0 {
            return Err(AnalyzerError::ConfigError(
                "words.top_words and words.pooled_top_words must be at least 1".to_string(),
            ));
        }

        if self.input.max_file_size_mb == 0 {
            return Err(AnalyzerError::ConfigError(
                "input.max_file_size_mb must be at least 1".to_string(),
            ));
        }

        if self
            .segmentation
            .boilerplate_markers
            .iter()
            .any(|m| m.trim().is_empty())
        {
            return Err(AnalyzerError::ConfigError(
                "segmentation.boilerplate_markers must not contain blank entries".to_string(),
            ));
        }

        Ok(())
    }
}
