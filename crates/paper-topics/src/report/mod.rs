//! Text and JSON renderings of a [`BatchReport`].

use std::fmt;

use crate::analysis::{TermScore, WordCount};
use crate::models::{BatchReport, CorpusAggregate, DocumentAnalysis, TagCount};

const BAR_WIDTH: usize = 30;
const QUESTION_PREVIEW_CHARS: usize = 72;

pub fn render_text(report: &BatchReport) -> String {
    TextReport(report).to_string()
}

pub fn render_json(report: &BatchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Display adapter that lays a report out as plain text with bar charts.
pub struct TextReport<'a>(pub &'a BatchReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        for (i, doc) in report.documents.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_document(f, doc)?;
        }

        if !report.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped files")?;
            for failure in &report.failures {
                writeln!(f, "  {}: {}", failure.name, failure.error)?;
            }
        }

        if let Some(combined) = &report.combined {
            writeln!(f)?;
            write_combined(f, combined)?;
        }

        Ok(())
    }
}

fn write_document(f: &mut fmt::Formatter<'_>, doc: &DocumentAnalysis) -> fmt::Result {
    writeln!(f, "=== {} ===", doc.name)?;
    writeln!(
        f,
        "{} paragraph(s), {} token(s)",
        doc.paragraph_count, doc.token_count
    )?;

    write_terms(f, "Key topics", &doc.terms)?;
    write_words(f, "Most common words", &doc.word_counts)?;

    if doc.tags.is_empty() {
        writeln!(f, "Categories: none")?;
    } else {
        writeln!(f, "Categories: {}", doc.tags.join(", "))?;
    }

    if let Some(questions) = &doc.questions {
        writeln!(f, "Questions ({})", questions.len())?;
        for q in questions {
            let tags = if q.tags.is_empty() {
                "-".to_string()
            } else {
                q.tags.join(", ")
            };
            writeln!(f, "  Q{} [{}] {}", q.index, tags, preview(&q.text))?;
        }
        write_tag_counts(f, &doc.tag_counts)?;
    }

    Ok(())
}

fn write_combined(f: &mut fmt::Formatter<'_>, combined: &CorpusAggregate) -> fmt::Result {
    writeln!(
        f,
        "=== Combined ({} documents) ===",
        combined.document_names.len()
    )?;

    write_terms(f, "Key topics", &combined.terms)?;
    write_words(f, "Most common words", &combined.word_counts)?;
    write_tag_counts(f, &combined.tag_counts)
}

/// An empty term list prints "no topics detected" in place of the block.
fn write_terms(f: &mut fmt::Formatter<'_>, title: &str, terms: &[TermScore]) -> fmt::Result {
    if terms.is_empty() {
        return writeln!(f, "  no topics detected");
    }

    writeln!(f, "{}", title)?;
    let width = label_width(terms.iter().map(|t| t.term.as_str()));
    let max = terms.iter().map(|t| t.score).fold(0.0, f64::max);

    for t in terms {
        writeln!(
            f,
            "  {:<width$} {:.3} {}",
            t.term,
            t.score,
            bar(t.score, max),
            width = width
        )?;
    }
    Ok(())
}

fn write_words(f: &mut fmt::Formatter<'_>, title: &str, words: &[WordCount]) -> fmt::Result {
    if words.is_empty() {
        return Ok(());
    }

    writeln!(f, "{}", title)?;
    let width = label_width(words.iter().map(|w| w.word.as_str()));
    let max = words.iter().map(|w| w.count).max().unwrap_or(0) as f64;

    for w in words {
        writeln!(
            f,
            "  {:<width$} {:>5} {}",
            w.word,
            w.count,
            bar(w.count as f64, max),
            width = width
        )?;
    }
    Ok(())
}

fn write_tag_counts(f: &mut fmt::Formatter<'_>, counts: &[TagCount]) -> fmt::Result {
    if counts.is_empty() {
        return Ok(());
    }

    writeln!(f, "Questions per category")?;
    let width = label_width(counts.iter().map(|c| c.label.as_str()));
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;

    for c in counts {
        writeln!(
            f,
            "  {:<width$} {:>3} {}",
            c.label,
            c.count,
            bar(c.count as f64, max),
            width = width
        )?;
    }
    Ok(())
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "#".repeat(len.min(BAR_WIDTH))
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= QUESTION_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(QUESTION_PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingMode;
    use crate::models::{FileFailure, QuestionUnit};
    use chrono::Utc;

    fn document(name: &str, terms: Vec<TermScore>) -> DocumentAnalysis {
        DocumentAnalysis {
            name: name.to_string(),
            paragraph_count: 2,
            token_count: 5,
            normalized_text: "huffman huffman entropy lzw coding".to_string(),
            terms,
            word_counts: vec![
                WordCount { word: "huffman".into(), count: 2 },
                WordCount { word: "coding".into(), count: 1 },
            ],
            tags: vec!["Compression & Coding".into()],
            questions: Some(vec![QuestionUnit {
                index: 1,
                text: "Explain Huffman coding with an example tree.".into(),
                tags: vec!["Compression & Coding".into()],
            }]),
            tag_counts: vec![TagCount { label: "Compression & Coding".into(), count: 1 }],
        }
    }

    fn report(documents: Vec<DocumentAnalysis>) -> BatchReport {
        BatchReport {
            generated_at: Utc::now(),
            mode: RankingMode::Unigram,
            documents,
            failures: vec![FileFailure {
                name: "broken.docx".into(),
                error: "Parsing error: not a zip archive".into(),
            }],
            combined: None,
        }
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(1.0, 1.0).len(), BAR_WIDTH);
        assert_eq!(bar(0.5, 1.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.001, 1.0).len(), 1);
        assert!(bar(0.0, 1.0).is_empty());
        assert!(bar(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "word ".repeat(40);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert!(p.chars().count() <= QUESTION_PREVIEW_CHARS + 3);
        assert_eq!(preview("short\n question"), "short question");
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&report(vec![document(
            "paper.docx",
            vec![
                TermScore { term: "huffman".into(), score: 0.8 },
                TermScore { term: "coding".into(), score: 0.4 },
            ],
        )]));

        assert!(text.contains("=== paper.docx ==="));
        assert!(text.contains("Key topics"));
        assert!(text.contains("huffman"));
        assert!(text.contains("Categories: Compression & Coding"));
        assert!(text.contains("Q1 [Compression & Coding]"));
        assert!(text.contains("broken.docx: Parsing error"));
        assert!(!text.contains("Combined"));
    }

    #[test]
    fn test_render_text_no_topics() {
        let text = render_text(&report(vec![document("blank.docx", Vec::new())]));
        assert!(text.contains("no topics detected"));
        assert!(!text.contains("Key topics"));
        assert!(text.contains("Most common words"));
        assert!(text.contains("Categories: Compression & Coding"));
        assert!(text.contains("Q1 [Compression & Coding]"));
        assert!(text.contains("Questions per category"));
    }

    #[test]
    fn test_render_combined_without_terms_keeps_counts() {
        let mut batch = report(Vec::new());
        batch.combined = Some(CorpusAggregate {
            document_names: vec!["a.docx".into(), "b.docx".into()],
            terms: Vec::new(),
            word_counts: vec![WordCount { word: "note".into(), count: 3 }],
            tag_counts: vec![TagCount { label: "Animation & Graphics".into(), count: 2 }],
        });

        let text = render_text(&batch);
        assert!(text.contains("=== Combined (2 documents) ==="));
        assert!(text.contains("no topics detected"));
        assert!(text.contains("note"));
        assert!(text.contains("Animation & Graphics"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&report(vec![document(
            "paper.docx",
            vec![TermScore { term: "huffman".into(), score: 1.0 }],
        )]))
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["mode"], "unigram");
        assert_eq!(value["documents"][0]["name"], "paper.docx");
        assert_eq!(value["documents"][0]["terms"][0]["term"], "huffman");
        assert!(value["documents"][0].get("normalized_text").is_none());
        assert!(value.get("combined").is_none());
        assert_eq!(value["failures"][0]["name"], "broken.docx");
    }
}
