//! Word lists and the category keyword table.
//!
//! Everything here is data, loaded once at startup and shared read-only.
//! The shipped defaults live in the crate's `config/` directory and are
//! compiled in; each can be replaced by a file named in [`LexiconConfig`].

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::settings::LexiconConfig;
use crate::utils::error::{AnalyzerError, Result};

const DEFAULT_STOPWORDS: &str = include_str!("../../config/stopwords.txt");
const DEFAULT_DOMAIN_NOISE: &str = include_str!("../../config/domain_noise.txt");
const DEFAULT_CATEGORIES: &str = include_str!("../../config/categories.toml");

/// A topic label and the lowercase substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub label: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True when any keyword occurs in `lowered`, which must already be
    /// lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    categories: Vec<Category>,
}

/// A set of lowercase words parsed from a one-word-per-line list.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Parse a list. Blank lines and lines starting with `#` are skipped.
    pub fn parse(source: &str, name: &str) -> Result<Self> {
        let mut words = HashSet::new();

        for (line_no, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.split_whitespace().count() != 1 {
                return Err(AnalyzerError::ConfigError(format!(
                    "{name}:{}: expected one word per line, got '{line}'",
                    line_no + 1
                )));
            }

            if line != line.to_lowercase() {
                return Err(AnalyzerError::ConfigError(format!(
                    "{name}:{}: '{line}' must be lowercase",
                    line_no + 1
                )));
            }

            words.insert(line.to_string());
        }

        if words.is_empty() {
            return Err(AnalyzerError::ConfigError(format!("{name} is empty")));
        }

        Ok(Self { words })
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Stopwords, ranking noise words and the category table.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub stopwords: WordList,
    pub domain_noise: WordList,
    pub categories: Vec<Category>,
}

impl Lexicon {
    /// Load the lexicon, reading any file named in `config` and falling
    /// back to the shipped lists otherwise.
    pub fn load(config: &LexiconConfig) -> Result<Self> {
        let stopwords = read_or_default(config.stopwords_path.as_deref(), DEFAULT_STOPWORDS)?;
        let domain_noise =
            read_or_default(config.domain_noise_path.as_deref(), DEFAULT_DOMAIN_NOISE)?;
        let categories = read_or_default(config.categories_path.as_deref(), DEFAULT_CATEGORIES)?;

        let lexicon = Self::from_sources(&stopwords, &domain_noise, &categories)?;

        info!(
            "Lexicon loaded: {} stopwords, {} noise words, {} categories",
            lexicon.stopwords.len(),
            lexicon.domain_noise.len(),
            lexicon.categories.len()
        );

        Ok(lexicon)
    }

    /// Build a lexicon from the raw text of the three sources.
    pub fn from_sources(stopwords: &str, domain_noise: &str, categories_toml: &str) -> Result<Self> {
        let stopwords = WordList::parse(stopwords, "stopwords")?;
        let domain_noise = WordList::parse(domain_noise, "domain noise")?;
        let file: CategoryFile = toml::from_str(categories_toml)?;

        let lexicon = Self {
            stopwords,
            domain_noise,
            categories: file.categories,
        };
        lexicon.validate_categories()?;

        Ok(lexicon)
    }

    /// The lexicon compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_sources(DEFAULT_STOPWORDS, DEFAULT_DOMAIN_NOISE, DEFAULT_CATEGORIES)
    }

    pub fn category_labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.label.as_str())
    }

    fn validate_categories(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(AnalyzerError::ConfigError(
                "category table has no categories".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let label = category.label.trim();
            if label.is_empty() {
                return Err(AnalyzerError::ConfigError(
                    "category label must not be blank".to_string(),
                ));
            }

            if !seen.insert(label.to_string()) {
                return Err(AnalyzerError::ConfigError(format!(
                    "duplicate category label '{label}'"
                )));
            }

            if category.keywords.is_empty() {
                return Err(AnalyzerError::ConfigError(format!(
                    "category '{label}' has no keywords"
                )));
            }

            for keyword in &category.keywords {
                if keyword.trim().is_empty() {
                    return Err(AnalyzerError::ConfigError(format!(
                        "category '{label}' has a blank keyword"
                    )));
                }
                if *keyword != keyword.to_lowercase() {
                    return Err(AnalyzerError::ConfigError(format!(
                        "category '{label}': keyword '{keyword}' must be lowercase"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn read_or_default(path: Option<&Path>, default: &str) -> Result<String> {
    match path {
        Some(p) => {
            debug!("Reading lexicon source {:?}", p);
            fs::read_to_string(p).map_err(|e| {
                AnalyzerError::ConfigError(format!("cannot read {}: {e}", p.display()))
            })
        }
        None => Ok(default.to_string()),
    }
}
