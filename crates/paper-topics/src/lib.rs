//! Topic and keyword extraction for exam past papers.
//!
//! A batch of documents is parsed into paragraphs, normalized, ranked by
//! TF-IDF, counted, split into numbered questions and tagged against a
//! category table. With two or more documents the results are also pooled.

pub mod analysis;
pub mod config;
pub mod document;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use config::{Lexicon, RankingMode, Settings};
pub use models::{BatchReport, CorpusAggregate, DocumentAnalysis};
pub use pipeline::DocumentProcessor;
pub use utils::error::{AnalyzerError, Result};
