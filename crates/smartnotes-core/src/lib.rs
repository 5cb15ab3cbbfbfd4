//! Smart Notes Core - record model and prompt template language
//!
//! This crate provides the pure, synchronous building blocks used by the
//! generation runtime:
//! - Records and record types (field names and values)
//! - Field reference parsing for `{{field}}` templates
//! - Case-insensitive template interpolation
//! - Template validation against a record type and generation map
//! - The generation map itself
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod generation_map;
pub mod record;
pub mod template;

// Re-export commonly used types
pub use error::{Result, TemplateError};
pub use generation_map::{FieldTemplate, GenerationMap, GenerationType, RecordTypeTemplates};
pub use record::{Record, RecordType};
pub use template::{field_references, interpolate, validate, Template};
