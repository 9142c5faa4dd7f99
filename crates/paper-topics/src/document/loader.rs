use mime_guess::mime;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::utils::error::{AnalyzerError, Result};

const BYTES_PER_MB: u64 = 1024 * 1024;

pub struct DocumentLoader;

impl DocumentLoader {
    /// Load file content from path
    pub fn load_file(path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(AnalyzerError::FileNotFound(path.display().to_string()));
        }

        if !path.is_file() {
            return Err(AnalyzerError::FileNotFound(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let content = fs::read(path)?;
        debug!("Loaded file: {:?} ({} bytes)", path, content.len());

        Ok(content)
    }

    /// Detect MIME type from path
    pub fn detect_file_type(path: &Path) -> String {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        mime.essence_str().to_string()
    }

    /// Word documents and plain text are supported
    pub fn is_supported(path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("docx") => true,
            Some("txt") | Some("md") | Some("text") => true,
            Some(_) => {
                // Check MIME type as fallback
                matches!(mime_guess::from_path(path).first(), Some(m) if m.type_() == mime::TEXT)
            }
            None => false,
        }
    }

    /// Validate file before parsing
    pub fn validate_file(path: &Path, max_size_mb: u64) -> Result<()> {
        if !path.exists() {
            return Err(AnalyzerError::FileNotFound(path.display().to_string()));
        }

        if !Self::is_supported(path) {
            return Err(AnalyzerError::UnsupportedFileType(path.display().to_string()));
        }

        let size = fs::metadata(path)?.len();

        if size > max_size_mb.saturating_mul(BYTES_PER_MB) {
            return Err(AnalyzerError::FileTooLarge(
                size.div_ceil(BYTES_PER_MB),
                max_size_mb,
            ));
        }

        debug!(
            "Validated {:?} ({})",
            path,
            Self::detect_file_type(path)
        );

        Ok(())
    }
}
