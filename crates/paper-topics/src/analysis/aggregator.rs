use tracing::{debug, info};

use super::frequency::most_common;
use super::ranker::TermRanker;
use crate::models::{CorpusAggregate, DocumentAnalysis, TagCount};

/// Pools per-document results once two or more documents are loaded.
pub struct Aggregator<'r, 'a> {
    ranker: &'r TermRanker<'a>,
    top_k: usize,
    top_words: usize,
}

impl<'r, 'a> Aggregator<'r, 'a> {
    pub fn new(ranker: &'r TermRanker<'a>, top_k: usize, top_words: usize) -> Self {
        Self {
            ranker,
            top_k,
            top_words,
        }
    }

    /// `None` for fewer than two documents.
    ///
    /// Terms come from one ranker call over every document's normalized
    /// text, each kept as its own input so shared terms are discounted.
    /// Word counts run over all token streams together. Tag counts are
    /// summed per label in `labels` order, skipping labels never seen.
    pub fn aggregate<'l, L>(&self, documents: &[DocumentAnalysis], labels: L) -> Option<CorpusAggregate>
    where
        L: IntoIterator<Item = &'l str>,
    {
        if documents.len() < 2 {
            debug!("Aggregation skipped: {} document(s)", documents.len());
            return None;
        }

        let texts: Vec<&str> = documents
            .iter()
            .map(|d| d.normalized_text.as_str())
            .collect();
        let terms = self.ranker.rank(&texts, self.top_k);

        let word_counts = most_common(documents.iter().flat_map(|d| d.tokens()), self.top_words);

        let tag_counts = labels
            .into_iter()
            .filter_map(|label| {
                let count: usize = documents
                    .iter()
                    .flat_map(|d| d.tag_counts.iter())
                    .filter(|tc| tc.label == label)
                    .map(|tc| tc.count)
                    .sum();
                (count > 0).then(|| TagCount {
                    label: label.to_string(),
                    count,
                })
            })
            .collect();

        info!(
            "Combined {} documents: {} pooled terms",
            documents.len(),
            terms.len()
        );

        Some(CorpusAggregate {
            document_names: documents.iter().map(|d| d.name.clone()).collect(),
            terms,
            word_counts,
            tag_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RankingMode, WordList};

    fn doc(name: &str, normalized: &str, tag_counts: &[(&str, usize)]) -> DocumentAnalysis {
        DocumentAnalysis {
            name: name.to_string(),
            paragraph_count: 1,
            token_count: normalized.split_whitespace().count(),
            normalized_text: normalized.to_string(),
            terms: Vec::new(),
            word_counts: Vec::new(),
            tags: Vec::new(),
            questions: None,
            tag_counts: tag_counts
                .iter()
                .map(|(label, count)| TagCount {
                    label: label.to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_inactive_for_single_document() {
        let noise = WordList::from_words(["marks"]);
        let ranker = TermRanker::new(&noise, RankingMode::Unigram, 5000);
        let aggregator = Aggregator::new(&ranker, 15, 15);

        let docs = vec![doc("a.docx", "audio sampling rate", &[])];
        assert!(aggregator.aggregate(&docs, ["Audio"]).is_none());
        assert!(aggregator.aggregate(&[], ["Audio"]).is_none());
    }

    #[test]
    fn test_pools_overlapping_documents() {
        let noise = WordList::from_words(["marks"]);
        let ranker = TermRanker::new(&noise, RankingMode::Unigram, 5000);
        let aggregator = Aggregator::new(&ranker, 15, 3);

        let docs = vec![
            doc("a.docx", "audio sampling rate audio", &[("Audio", 2)]),
            doc("b.docx", "audio pixel marks", &[("Audio", 1), ("Image", 1)]),
        ];
        let combined = aggregator
            .aggregate(&docs, ["Audio", "Image", "Compression"])
            .unwrap();

        assert_eq!(combined.document_names, vec!["a.docx", "b.docx"]);
        assert!(!combined.terms.is_empty());
        assert!(combined.terms.iter().any(|t| t.term == "audio"));
        assert!(combined.terms.iter().all(|t| t.term != "marks"));

        assert_eq!(combined.word_counts.len(), 3);
        assert_eq!(combined.word_counts[0].word, "audio");
        assert_eq!(combined.word_counts[0].count, 3);

        assert_eq!(
            combined.tag_counts,
            vec![
                TagCount { label: "Audio".into(), count: 3 },
                TagCount { label: "Image".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_respects_pooled_top_k() {
        let noise = WordList::from_words(["marks"]);
        let ranker = TermRanker::new(&noise, RankingMode::Unigram, 5000);
        let aggregator = Aggregator::new(&ranker, 2, 15);

        let docs = vec![
            doc("a.docx", "audio video pixel codec", &[]),
            doc("b.docx", "frame raster bitmap", &[]),
        ];
        let combined = aggregator.aggregate(&docs, std::iter::empty()).unwrap();
        assert_eq!(combined.terms.len(), 2);
        assert!(combined.tag_counts.is_empty());
    }
}
