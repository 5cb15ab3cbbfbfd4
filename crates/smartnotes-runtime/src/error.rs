//! Runtime error types

use smartnotes_core::TemplateError;
use smartnotes_llm::LLMError;
use thiserror::Error;

/// Runtime error type
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The generation capability failed or returned an unusable response
    #[error("Generation request failed: {0}")]
    GenerationRequestFailed(String),

    /// Template rejected at authoring time
    #[error("Invalid prompt: {0}")]
    Template(#[from] TemplateError),

    /// Record type not known to the catalog
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    /// Field not present on the record type
    #[error("Unknown field '{field}' on record type '{record_type}'")]
    UnknownField { record_type: String, field: String },

    /// No API key configured
    #[error("No OpenAI API key found. Please enter your API key in the options menu.")]
    MissingApiKey,

    /// Configuration store error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<LLMError> for RuntimeError {
    fn from(err: LLMError) -> Self {
        RuntimeError::GenerationRequestFailed(err.to_string())
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
