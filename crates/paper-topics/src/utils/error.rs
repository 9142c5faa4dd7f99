use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {0} MB (max: {1} MB)")]
    FileTooLarge(u64, u64),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for AnalyzerError {
    fn from(err: config::ConfigError) -> Self {
        AnalyzerError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for AnalyzerError {
    fn from(err: toml::de::Error) -> Self {
        AnalyzerError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
