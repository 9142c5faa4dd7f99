use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{PunctuationPolicy, WordList};

/// ASCII punctuation plus every Unicode punctuation character (curly
/// quotes, dashes, ellipses).
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{P}[:punct:]]").expect("punctuation pattern is valid"));

/// Lowercases, strips punctuation, drops digit-only tokens and stopwords.
///
/// The output is a single-space separated token stream. Normalizing an
/// already normalized string returns it unchanged.
pub struct TextNormalizer<'a> {
    stopwords: &'a WordList,
    policy: PunctuationPolicy,
}

impl<'a> TextNormalizer<'a> {
    pub fn new(stopwords: &'a WordList, policy: PunctuationPolicy) -> Self {
        Self { stopwords, policy }
    }

    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    /// Surviving tokens in order of appearance.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        let stripped: String = match self.policy {
            PunctuationPolicy::LettersOnly => lowered
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
                .collect(),
            PunctuationPolicy::AsciiPunctuation => {
                PUNCTUATION.replace_all(&lowered, "").into_owned()
            }
        };

        stripped
            .split_whitespace()
            .filter(|token| !is_digits(token))
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }
}

fn is_digits(token: &str) -> bool {
    token.chars().all(char::is_numeric)
}
