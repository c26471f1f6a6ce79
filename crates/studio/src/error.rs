//! Error types for template-studio

use template::TemplateError;
use thiserror::Error;

/// Errors that can occur while loading templates, fonts or generating PDFs
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Failed to load font from {url} (HTTP {status})")]
    FontFetch { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("{0}")]
    Generation(String),

    #[error("Failed to fetch template from {url} (HTTP {status})")]
    TemplateFetch { url: String, status: u16 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Classify a template error raised while reading a template
    pub(crate) fn from_template_load(err: TemplateError) -> Self {
        match err {
            TemplateError::JsonError(e) => StudioError::MalformedJson(e),
            TemplateError::InvalidTemplate(message) => StudioError::InvalidTemplate(message),
            other => StudioError::InvalidTemplate(other.to_string()),
        }
    }
}

impl From<TemplateError> for StudioError {
    /// Anything the engine raises outside template loading is a generation failure
    fn from(err: TemplateError) -> Self {
        StudioError::Generation(err.to_string())
    }
}

/// Result type for studio operations
pub type Result<T> = std::result::Result<T, StudioError>;
