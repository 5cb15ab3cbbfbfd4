//! Prompt template language
//!
//! Templates are plain prompt text with `{{field}}` references to other fields
//! of the same record. Field names are matched case-insensitively.
//!
//! ```rust
//! use smartnotes_core::{Record, Template};
//!
//! let template = Template::new("Translate {{Front}} to English");
//! let record = Record::new(1, "Basic").with_field("front", "gato");
//!
//! assert_eq!(template.references().collect::<Vec<_>>(), vec!["front"]);
//! assert_eq!(template.interpolate(&record), "Translate gato to English");
//! ```

mod interpolate;
mod parser;
mod validator;

pub use interpolate::interpolate;
pub use parser::field_references;
pub use validator::validate;

use crate::error::Result;
use crate::generation_map::GenerationMap;
use crate::record::{Record, RecordType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A prompt string containing zero or more `{{field}}` references
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(String);

impl Template {
    /// Wrap a raw prompt string
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the template has no text at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercased field references, in order of appearance
    pub fn references(&self) -> impl Iterator<Item = String> + '_ {
        field_references(&self.0)
    }

    /// Resolve the template against a record's field values
    pub fn interpolate(&self, record: &Record) -> String {
        interpolate(&self.0, record)
    }

    /// Check the template is legal for `target_field` of `record_type`
    pub fn validate(
        &self,
        record_type: &RecordType,
        map: &GenerationMap,
        target_field: Option<&str>,
    ) -> Result<()> {
        validate(&self.0, record_type, map, target_field)
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
