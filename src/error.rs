//! Error types for EduAid.

use thiserror::Error;

/// Library-level error type for EduAid operations.
#[derive(Error, Debug)]
pub enum EduAidError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Document contains no extractable text: {0}")]
    EmptyDocument(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Summarization failed for all {count} chunks (first error: {first_error})")]
    AllChunksFailed { count: usize, first_error: String },

    #[error("Speech synthesis failed: {0}")]
    Speech(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for EduAid operations.
pub type Result<T> = std::result::Result<T, EduAidError>;
