//! Smart Notes Runtime
//!
//! Fills in record fields from per-field prompt templates:
//! - [`Orchestrator`]: decides which fields need generation, interpolates
//!   their templates against a snapshot of the record and writes results back
//! - [`Generator`]: the external text-generation capability, dispatched by
//!   generation type through a [`GeneratorRegistry`]
//! - [`Settings`]: explicit configuration with `load()`/`save()` against a
//!   [`ConfigStore`]
//! - [`TemplateAuthoring`]: validates templates before admitting them into
//!   the generation map
//! - [`SmartNotes`]: context object wiring the above together

pub mod authoring;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod generation;
pub mod orchestrator;

// Re-export main types
pub use authoring::TemplateAuthoring;
pub use catalog::{InMemoryCatalog, RecordTypeCatalog};
pub use config::{ConfigStore, JsonFileConfigStore, MemoryConfigStore, Settings};
pub use context::{SmartNotes, SmartNotesBuilder};
pub use error::{Result, RuntimeError};
pub use generation::{ChatGenerator, Generator, GeneratorRegistry};
pub use orchestrator::{
    FieldOutcome, FieldSkip, FieldStatus, Orchestrator, ProcessMode, ProcessReport, PromptPreview,
    RecordSkip,
};

// Re-export commonly used types from dependencies
pub use smartnotes_core::{
    FieldTemplate, GenerationMap, GenerationType, Record, RecordType, Template, TemplateError,
};
