use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{TermScore, WordCount};
use crate::config::RankingMode;

/// A numbered question from a paper with the categories it mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionUnit {
    pub index: usize,
    pub text: String,
    pub tags: Vec<String>,
}

/// How many questions mention a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub label: String,
    pub count: usize,
}

/// Everything derived from one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub name: String,
    pub paragraph_count: usize,
    pub token_count: usize,
    #[serde(skip)]
    pub normalized_text: String,
    pub terms: Vec<TermScore>,
    pub word_counts: Vec<WordCount>,
    /// Categories matched anywhere in the document
    pub tags: Vec<String>,
    /// Present only when question segmentation ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionUnit>>,
    pub tag_counts: Vec<TagCount>,
}

impl DocumentAnalysis {
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.normalized_text.split_whitespace()
    }

    /// False when nothing rankable survived normalization.
    pub fn has_topics(&self) -> bool {
        !self.terms.is_empty()
    }
}

/// Combined results over every loaded document.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusAggregate {
    pub document_names: Vec<String>,
    pub terms: Vec<TermScore>,
    pub word_counts: Vec<WordCount>,
    pub tag_counts: Vec<TagCount>,
}

/// A file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub mode: RankingMode,
    pub documents: Vec<DocumentAnalysis>,
    pub failures: Vec<FileFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<CorpusAggregate>,
}

impl BatchReport {
    /// True when files were given and none of them could be analyzed.
    pub fn all_failed(&self) -> bool {
        self.documents.is_empty() && !self.failures.is_empty()
    }
}
