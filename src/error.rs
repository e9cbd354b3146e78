//! Error handling for the resume critic

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeCriticError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Uploaded file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Document contains no extractable text: {0}")]
    EmptyDocument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Pattern compilation error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Qualitative analysis error: {0}")]
    QualitativeAnalysis(String),
}

pub type Result<T> = std::result::Result<T, ResumeCriticError>;

impl From<serde_yaml::Error> for ResumeCriticError {
    fn from(err: serde_yaml::Error) -> Self {
        ResumeCriticError::Vocabulary(err.to_string())
    }
}

impl From<toml::de::Error> for ResumeCriticError {
    fn from(err: toml::de::Error) -> Self {
        ResumeCriticError::Configuration(format!("Failed to parse config: {}", err))
    }
}
