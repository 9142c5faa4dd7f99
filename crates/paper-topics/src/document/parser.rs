use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::path::Path;
use tracing::debug;

use super::loader::DocumentLoader;
use crate::utils::error::{AnalyzerError, Result};

/// Turns a document file into its ordered paragraph texts.
pub trait ParagraphExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub paragraphs: Vec<String>,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub file_type: String,
    pub char_count: usize,
    pub encoding: String,
}

/// `.docx` through docx-rs, anything else as decoded plain text with one
/// paragraph per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    /// Parse document from path
    pub fn parse(path: &Path) -> Result<ParsedDocument> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        debug!("Parsing file: {:?} (type: {})", path, extension);

        let bytes = DocumentLoader::load_file(path)?;

        let parsed = match extension.as_str() {
            "docx" => Self::parse_docx(&bytes)?,
            _ => Self::parse_text(&bytes),
        };

        debug!(
            "Parsed {} paragraphs ({} chars, {}, {}) from {:?}",
            parsed.paragraphs.len(),
            parsed.metadata.char_count,
            parsed.metadata.file_type,
            parsed.metadata.encoding,
            path
        );

        Ok(parsed)
    }

    /// Parse DOCX bytes using docx-rs.
    ///
    /// Only body paragraphs are read; tables, headers and footers are
    /// skipped. Tabs and line breaks inside a paragraph are kept.
    pub fn parse_docx(bytes: &[u8]) -> Result<ParsedDocument> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| AnalyzerError::ParsingError(format!("invalid docx: {e:?}")))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
                _ => None,
            })
            .collect();

        let metadata = DocumentMetadata {
            file_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .to_string(),
            char_count: paragraphs.iter().map(|p| p.chars().count()).sum(),
            encoding: "UTF-8".to_string(),
        };

        Ok(ParsedDocument {
            paragraphs,
            metadata,
        })
    }

    /// Parse plain text, one paragraph per line
    pub fn parse_text(bytes: &[u8]) -> ParsedDocument {
        let (content, encoding) = Self::decode_text(bytes);

        let paragraphs: Vec<String> = content
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();

        let metadata = DocumentMetadata {
            file_type: "text/plain".to_string(),
            char_count: content.chars().count(),
            encoding: encoding.name().to_string(),
        };

        ParsedDocument {
            paragraphs,
            metadata,
        }
    }

    /// Decode as UTF-8 (BOM aware), falling back to Windows-1252
    fn decode_text(bytes: &[u8]) -> (String, &'static Encoding) {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            return (text.into_owned(), encoding);
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            return (text.to_string(), UTF_8);
        }

        let (text, _, _) = WINDOWS_1252.decode(bytes);
        (text.into_owned(), WINDOWS_1252)
    }
}

impl ParagraphExtractor for DocumentParser {
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        Ok(Self::parse(path)?.paragraphs)
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&para.children, &mut text);
    text
}

fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}
