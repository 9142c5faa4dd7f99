use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis::{
    most_common, Aggregator, QuestionSegmenter, RuleTagger, TermRanker, TextNormalizer,
};
use crate::config::{Lexicon, Settings};
use crate::document::{DocumentLoader, DocumentParser, ParagraphExtractor};
use crate::models::{
    BatchReport, CorpusAggregate, DocumentAnalysis, FileFailure, QuestionUnit, TagCount,
};
use crate::utils::error::Result;
use crate::utils::{Metrics, Timer};

/// Runs the topic pipeline over documents, one at a time in the order
/// given.
pub struct DocumentProcessor {
    settings: Settings,
    lexicon: Arc<Lexicon>,
    extractor: Box<dyn ParagraphExtractor>,
    metrics: Metrics,
}

impl DocumentProcessor {
    pub fn new(settings: Settings, lexicon: Arc<Lexicon>) -> Self {
        Self::with_extractor(settings, lexicon, Box::new(DocumentParser))
    }

    pub fn with_extractor(
        settings: Settings,
        lexicon: Arc<Lexicon>,
        extractor: Box<dyn ParagraphExtractor>,
    ) -> Self {
        Self {
            settings,
            lexicon,
            extractor,
            metrics: Metrics::new(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Analyze every file, skipping (and recording) the ones that fail.
    pub fn process_batch<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        info!("📄 Processing {} file(s)", paths.len());

        let mut documents = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();

        for path in paths {
            let path = path.as_ref();
            match self.process_file(path) {
                Ok(analysis) => {
                    self.metrics.increment_documents_processed();
                    documents.push(analysis);
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    self.metrics.increment_documents_failed();
                    failures.push(FileFailure {
                        name: display_name(path),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = self.finish(documents, failures);
        self.metrics.log_summary();
        report
    }

    /// Analyze in-memory texts, each given as (name, full text).
    pub fn process_texts<N, T>(&self, texts: impl IntoIterator<Item = (N, T)>) -> BatchReport
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let documents: Vec<DocumentAnalysis> = texts
            .into_iter()
            .map(|(name, text)| {
                let paragraphs: Vec<String> =
                    text.as_ref().lines().map(str::to_string).collect();
                let analysis = self.analyze_document(name.as_ref(), &paragraphs);
                self.metrics.increment_documents_processed();
                analysis
            })
            .collect();

        self.finish(documents, Vec::new())
    }

    /// Validate, parse and analyze one file.
    pub fn process_file(&self, path: &Path) -> Result<DocumentAnalysis> {
        let timer = Timer::new();

        DocumentLoader::validate_file(path, self.settings.input.max_file_size_mb)?;
        let paragraphs = self.extractor.extract(path)?;

        let analysis = self.analyze_document(&display_name(path), &paragraphs);

        self.metrics.add_processing_time(timer.elapsed());
        debug!("Processed {:?} in {:?}", path, timer.elapsed());

        Ok(analysis)
    }

    /// Run normalization, ranking, word counting, tagging and (when enabled)
    /// question segmentation over one document's paragraphs.
    pub fn analyze_document(&self, name: &str, paragraphs: &[String]) -> DocumentAnalysis {
        let lexicon = &*self.lexicon;
        let text = paragraphs.join("\n");

        let normalizer = TextNormalizer::new(&lexicon.stopwords, self.settings.normalizer.punctuation);
        let tokens = normalizer.tokens(&text);
        let normalized_text = tokens.join(" ");

        let ranker = self.ranker();
        let terms = ranker.rank(&[normalized_text.as_str()], self.settings.ranking.top_k);
        let word_counts = most_common(
            tokens.iter().map(String::as_str),
            self.settings.words.top_words,
        );

        let tagger = RuleTagger::new(&lexicon.categories);
        let tags = tagger.tag(&text).into_iter().map(str::to_string).collect();

        let questions = self.settings.segmentation.enabled.then(|| {
            let segmenter = QuestionSegmenter::new(&self.settings.segmentation);
            segmenter
                .segment(&text)
                .into_iter()
                .map(|span| QuestionUnit {
                    index: span.index,
                    tags: tagger.tag(&span.text).into_iter().map(str::to_string).collect(),
                    text: span.text,
                })
                .collect::<Vec<_>>()
        });

        let tag_counts = questions
            .as_deref()
            .map(|qs| count_tags(&tagger, qs))
            .unwrap_or_default();

        if let Some(qs) = &questions {
            self.metrics.add_questions_segmented(qs.len() as u64);
        }

        if terms.is_empty() {
            info!("{}: no topics detected", name);
        } else {
            info!(
                "{}: {} terms, {} question(s)",
                name,
                terms.len(),
                questions.as_ref().map_or(0, Vec::len)
            );
        }

        DocumentAnalysis {
            name: name.to_string(),
            paragraph_count: paragraphs.len(),
            token_count: tokens.len(),
            normalized_text,
            terms,
            word_counts,
            tags,
            questions,
            tag_counts,
        }
    }

    /// Pooled results, or `None` for fewer than two documents.
    pub fn aggregate(&self, documents: &[DocumentAnalysis]) -> Option<CorpusAggregate> {
        let ranker = self.ranker();
        let aggregator = Aggregator::new(
            &ranker,
            self.settings.ranking.pooled_top_k,
            self.settings.words.pooled_top_words,
        );
        aggregator.aggregate(documents, self.lexicon.category_labels())
    }

    fn ranker(&self) -> TermRanker<'_> {
        TermRanker::new(
            &self.lexicon.domain_noise,
            self.settings.ranking.mode,
            self.settings.ranking.max_features,
        )
    }

    fn finish(&self, documents: Vec<DocumentAnalysis>, failures: Vec<FileFailure>) -> BatchReport {
        let combined = self.aggregate(&documents);

        BatchReport {
            generated_at: Utc::now(),
            mode: self.settings.ranking.mode,
            documents,
            failures,
            combined,
        }
    }
}

fn count_tags(tagger: &RuleTagger<'_>, questions: &[QuestionUnit]) -> Vec<TagCount> {
    tagger
        .labels()
        .filter_map(|label| {
            let count = questions
                .iter()
                .filter(|q| q.tags.iter().any(|t| t == label))
                .count();
            (count > 0).then(|| TagCount {
                label: label.to_string(),
                count,
            })
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingMode;

    fn processor(settings: Settings) -> DocumentProcessor {
        DocumentProcessor::new(settings, Arc::new(Lexicon::builtin().unwrap()))
    }

    fn paragraphs(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_analyze_document_end_to_end() {
        let p = processor(Settings::default());
        let analysis = p.analyze_document(
            "paper.docx",
            &paragraphs(&[
                "FINAL EXAMINATION PAPER",
                "1. Explain the Huffman coding algorithm and build the code tree for AABBBC.",
                "2. Describe how the sampling rate affects audio quality (10 marks).",
                "3. Section B",
            ]),
        );

        assert_eq!(analysis.paragraph_count, 4);
        assert!(analysis.has_topics());
        assert!(analysis.terms.len() <= 10);
        assert!(analysis.terms.iter().all(|t| t.term != "marks" && t.term != "explain"));
        assert!(!analysis.normalized_text.contains("the "));

        let questions = analysis.questions.as_ref().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].tags, vec!["Compression & Coding"]);
        assert_eq!(questions[1].tags, vec!["Audio & Sound Processing"]);
        assert_eq!(
            analysis.tag_counts,
            vec![
                TagCount { label: "Audio & Sound Processing".into(), count: 1 },
                TagCount { label: "Compression & Coding".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_segmentation_disabled() {
        let mut settings = Settings::default();
        settings.segmentation.enabled = false;
        let analysis = processor(settings)
            .analyze_document("a.txt", &paragraphs(&["1. Explain pixel depth in raster images."]));

        assert!(analysis.questions.is_none());
        assert!(analysis.tag_counts.is_empty());
        assert_eq!(analysis.tags, vec!["Image & Video Processing"]);
    }

    #[test]
    fn test_empty_document_is_valid_and_empty() {
        let analysis = processor(Settings::default()).analyze_document("blank.docx", &[]);
        assert!(!analysis.has_topics());
        assert!(analysis.word_counts.is_empty());
        assert!(analysis.tags.is_empty());
        assert_eq!(analysis.questions, Some(Vec::new()));
    }

    #[test]
    fn test_phrase_mode_terms() {
        let mut settings = Settings::default();
        settings.ranking.mode = RankingMode::Phrases;
        let analysis = processor(settings).analyze_document(
            "a.txt",
            &paragraphs(&["Run length encoding and run length decoding"]),
        );
        assert_eq!(analysis.terms[0].term, "run length");
        assert!(analysis.terms.iter().all(|t| t.term.contains(' ')));
    }

    #[test]
    fn test_single_text_has_no_combined_result() {
        let report = processor(Settings::default())
            .process_texts([("a.txt", "Describe pixel sampling rate for audio signals.")]);
        assert_eq!(report.documents.len(), 1);
        assert!(report.combined.is_none());
    }

    #[test]
    fn test_batch_skips_failed_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        std::fs::write(&good, "1. Compare JPEG and PNG image compression schemes.").unwrap();
        let missing = dir.path().join("missing.docx");

        let p = processor(Settings::default());
        let report = p.process_batch(&[missing, good]);

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].name, "good.txt");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "missing.docx");
        assert!(!report.all_failed());
        assert_eq!(p.metrics().get_documents_failed(), 1);
        assert_eq!(p.metrics().get_documents_processed(), 1);
    }
}
