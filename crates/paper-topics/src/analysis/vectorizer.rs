//! TF-IDF term weighting.
//!
//! Tokens are runs of two or more word characters, lowercased. Excluded
//! words are removed before n-grams are formed. IDF is smoothed:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`. The vocabulary is capped to
//! the `max_features` terms with the highest corpus frequency and is kept in
//! alphabetical order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::WordList;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

pub struct TfidfVectorizer<'a> {
    ngram_range: (usize, usize),
    max_features: usize,
    excluded: Option<&'a WordList>,
}

impl<'a> TfidfVectorizer<'a> {
    /// `ngram_range` is inclusive and must start at 1 or more.
    pub fn new(ngram_range: (usize, usize), max_features: usize) -> Self {
        let min_n = ngram_range.0.max(1);
        Self {
            ngram_range: (min_n, ngram_range.1.max(min_n)),
            max_features,
            excluded: None,
        }
    }

    pub fn with_excluded_words(mut self, words: &'a WordList) -> Self {
        self.excluded = Some(words);
        self
    }

    /// Terms of one document in order, n-grams included.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| self.excluded.map_or(true, |words| !words.contains(t)))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Fit over `documents` and return one pooled weight per vocabulary term,
    /// in vocabulary (alphabetical) order.
    ///
    /// The pooled weight is the term's count over all documents times its
    /// IDF, L2-normalised over the vocabulary. With a single document the
    /// IDF is constant, so weights reduce to normalised term counts.
    pub fn fit_pooled<S: AsRef<str>>(&self, documents: &[S]) -> Vec<(String, f64)> {
        let n_docs = documents.len();
        if n_docs == 0 || self.max_features == 0 {
            return Vec::new();
        }

        let mut term_counts: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.analyze(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
            for term in terms {
                *term_counts.entry(term).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Vec::new();
        }

        let vocabulary = self.limit_features(term_counts);

        let weighted: BTreeMap<String, f64> = vocabulary
            .into_iter()
            .map(|(term, count)| {
                let df = doc_freq.get(&term).copied().unwrap_or(1);
                let idf = ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0;
                (term, count as f64 * idf)
            })
            .collect();

        let norm = weighted.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Vec::new();
        }

        weighted
            .into_iter()
            .map(|(term, w)| (term, w / norm))
            .collect()
    }

    /// Keep the `max_features` most frequent terms, ties alphabetical.
    fn limit_features(&self, term_counts: HashMap<String, u64>) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> = term_counts.into_iter().collect();
        if counts.len() > self.max_features {
            counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            counts.truncate(self.max_features);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(weights: &[(String, f64)], term: &str) -> f64 {
        weights
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, w)| *w)
            .unwrap_or_else(|| panic!("missing term {term}"))
    }

    #[test]
    fn test_analyze_unigrams_skips_single_chars() {
        let vectorizer = TfidfVectorizer::new((1, 1), 100);
        assert_eq!(
            vectorizer.analyze("A JPEG, b-frame x"),
            vec!["jpeg".to_string(), "frame".to_string()]
        );
    }

    #[test]
    fn test_analyze_ngrams_after_exclusion() {
        let noise = WordList::from_words(["explain"]);
        let vectorizer = TfidfVectorizer::new((2, 3), 100).with_excluded_words(&noise);
        assert_eq!(
            vectorizer.analyze("explain huffman coding tree"),
            vec![
                "huffman coding".to_string(),
                "coding tree".to_string(),
                "huffman coding tree".to_string(),
            ]
        );
    }

    #[test]
    fn test_single_document_weights_are_normalised_counts() {
        let vectorizer = TfidfVectorizer::new((1, 1), 100);
        let weights = vectorizer.fit_pooled(&["huffman huffman coding"]);

        let norm = 5f64.sqrt();
        assert_eq!(weights.len(), 2);
        assert!((weight(&weights, "huffman") - 2.0 / norm).abs() < 1e-12);
        assert!((weight(&weights, "coding") - 1.0 / norm).abs() < 1e-12);
    }

    #[test]
    fn test_vocabulary_is_alphabetical() {
        let vectorizer = TfidfVectorizer::new((1, 1), 100);
        let terms: Vec<String> = vectorizer
            .fit_pooled(&["pixel audio codec"])
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(terms, vec!["audio", "codec", "pixel"]);
    }

    #[test]
    fn test_idf_discounts_shared_terms() {
        let vectorizer = TfidfVectorizer::new((1, 1), 100);
        let weights = vectorizer.fit_pooled(&["audio audio pixel", "audio video"]);

        // audio: count 3, df 2 -> idf 1; pixel: count 1, df 1 -> idf ln(3/2) + 1
        let idf_rare = (3.0f64 / 2.0).ln() + 1.0;
        let ratio = weight(&weights, "audio") / weight(&weights, "pixel");
        assert!((ratio - 3.0 / idf_rare).abs() < 1e-12);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let vectorizer = TfidfVectorizer::new((1, 1), 2);
        let weights = vectorizer.fit_pooled(&["zeta zeta zeta beta beta alpha gamma"]);
        let terms: Vec<&str> = weights.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["beta", "zeta"]);
    }

    #[test]
    fn test_empty_inputs() {
        let vectorizer = TfidfVectorizer::new((1, 1), 100);
        let none: [&str; 0] = [];
        assert!(vectorizer.fit_pooled(&none).is_empty());
        assert!(vectorizer.fit_pooled(&["", "a b c"]).is_empty());
    }

    #[test]
    fn test_ngram_longer_than_document() {
        let vectorizer = TfidfVectorizer::new((2, 3), 100);
        assert!(vectorizer.analyze("huffman").is_empty());
        assert_eq!(vectorizer.analyze("huffman coding"), vec!["huffman coding".to_string()]);
    }
}
