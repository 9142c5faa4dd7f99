use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::{NoMarkerFallback, SegmentationConfig};

/// A line starting with a 1-2 digit number, a period and whitespace.
static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d{1,2}\.\s+").expect("question marker pattern is valid")
});

/// One question cut out of a paper, before tagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSpan {
    /// 1-based position among the kept questions
    pub index: usize,
    pub text: String,
}

pub struct QuestionSegmenter {
    min_chars: usize,
    boilerplate_markers: Vec<String>,
    fallback: NoMarkerFallback,
}

impl QuestionSegmenter {
    pub fn new(config: &SegmentationConfig) -> Self {
        Self {
            min_chars: config.min_question_chars,
            boilerplate_markers: config
                .boilerplate_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            fallback: config.no_marker_fallback,
        }
    }

    /// True when the text contains at least one numbering marker.
    pub fn has_markers(text: &str) -> bool {
        QUESTION_MARKER.is_match(text)
    }

    /// Split at every numbering marker.
    ///
    /// Returns the trimmed, non-empty pieces in order, markers excluded. The
    /// text before the first marker is included when it is not blank.
    pub fn split(text: &str) -> Vec<String> {
        QUESTION_MARKER
            .split(text)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Split and filter into question spans.
    pub fn segment(&self, text: &str) -> Vec<QuestionSpan> {
        let candidates = if Self::has_markers(text) {
            Self::split(text)
        } else {
            match self.fallback {
                NoMarkerFallback::WholeDocument => {
                    let whole = text.trim();
                    if whole.is_empty() {
                        Vec::new()
                    } else {
                        vec![whole.to_string()]
                    }
                }
                NoMarkerFallback::Discard => {
                    debug!("No question numbering found, discarding text");
                    Vec::new()
                }
            }
        };

        let total = candidates.len();
        let questions: Vec<QuestionSpan> = candidates
            .into_iter()
            .filter(|c| self.is_question(c))
            .enumerate()
            .map(|(i, text)| QuestionSpan { index: i + 1, text })
            .collect();

        debug!(
            "Segmented {} questions from {} candidates",
            questions.len(),
            total
        );

        questions
    }

    fn is_question(&self, candidate: &str) -> bool {
        if candidate.chars().count() < self.min_chars {
            return false;
        }

        let lowered = candidate.to_lowercase();
        !self
            .boilerplate_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
    }
}
