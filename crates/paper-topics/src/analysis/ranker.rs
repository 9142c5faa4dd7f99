use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::vectorizer::TfidfVectorizer;
use crate::config::{RankingMode, WordList};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Ranks the terms or phrases of one or more texts by TF-IDF weight.
///
/// Every call fits a fresh model over exactly the texts it is given.
pub struct TermRanker<'a> {
    noise_words: &'a WordList,
    mode: RankingMode,
    max_features: usize,
}

impl<'a> TermRanker<'a> {
    pub fn new(noise_words: &'a WordList, mode: RankingMode, max_features: usize) -> Self {
        Self {
            noise_words,
            mode,
            max_features,
        }
    }

    /// Top `k` terms, highest weight first. Equal weights keep vocabulary
    /// order. Texts with no usable terms give an empty result.
    pub fn rank<S: AsRef<str>>(&self, texts: &[S], k: usize) -> Vec<TermScore> {
        if k == 0 {
            return Vec::new();
        }

        let vectorizer = TfidfVectorizer::new(self.mode.ngram_range(), self.max_features)
            .with_excluded_words(self.noise_words);

        let mut scores: Vec<TermScore> = vectorizer
            .fit_pooled(texts)
            .into_iter()
            .map(|(term, score)| TermScore { term, score })
            .collect();

        debug!(
            "Ranking {} terms from {} texts ({:?})",
            scores.len(),
            texts.len(),
            self.mode
        );

        // Stable sort: ties stay in vocabulary order
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scores.truncate(k);
        scores
    }
}
