//! Error types for Smart Notes Core

use thiserror::Error;

/// Template authoring error
///
/// Raised when a template is created or edited. An invalid template is never
/// admitted into the generation map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references a field the record type does not have
    #[error("Invalid field in prompt: {field}")]
    InvalidFieldReference { field: String },

    /// The template references a field that is itself generated
    #[error("Can't reference other smart fields ({field}) in the prompt.")]
    ChainedGenerationNotAllowed { field: String },

    /// The template references its own target field
    #[error("Cannot reference the target field in the prompt.")]
    SelfReferenceNotAllowed { field: String },
}

impl TemplateError {
    /// The lowercased field reference that triggered the error
    pub fn field(&self) -> &str {
        match self {
            TemplateError::InvalidFieldReference { field }
            | TemplateError::ChainedGenerationNotAllowed { field }
            | TemplateError::SelfReferenceNotAllowed { field } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_display() {
        let error = TemplateError::InvalidFieldReference {
            field: "extra".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid field in prompt: extra");
        assert_eq!(error.field(), "extra");
    }

    #[test]
    fn test_chained_generation_display() {
        let error = TemplateError::ChainedGenerationNotAllowed {
            field: "back".to_string(),
        };
        assert!(error.to_string().contains("(back)"));
    }

    #[test]
    fn test_self_reference_display() {
        let error = TemplateError::SelfReferenceNotAllowed {
            field: "back".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot reference the target field in the prompt."
        );
    }
}
