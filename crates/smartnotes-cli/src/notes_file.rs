//! Notes file loading and saving
//!
//! A notes file declares record types and the records to work on:
//!
//! ```yaml
//! record_types:
//!   - name: Basic
//!     fields: [Front, Back]
//! records:
//!   - id: 1
//!     record_type: Basic
//!     fields:
//!       Front: perro
//! ```
//!
//! Files ending in `.yaml` or `.yml` are YAML; anything else is JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smartnotes_runtime::{InMemoryCatalog, Record, RecordType};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesFile {
    #[serde(default)]
    pub record_types: Vec<RecordType>,

    #[serde(default)]
    pub records: Vec<Record>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl NotesFile {
    /// Load from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read notes file {}", path.display()))?;

        let notes: NotesFile = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML in {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON in {}", path.display()))?
        };

        for record in &notes.records {
            if notes.record_type(&record.record_type).is_none() {
                tracing::warn!(
                    "Record {} uses undeclared record type {}",
                    record.id,
                    record.record_type
                );
            }
        }

        Ok(notes)
    }

    /// Save to a file, in the format implied by its extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        fs::write(path, content)
            .with_context(|| format!("Failed to write notes file {}", path.display()))?;
        Ok(())
    }

    pub fn record_type(&self, name: &str) -> Option<&RecordType> {
        self.record_types.iter().find(|t| t.name == name)
    }

    /// Catalog of the declared record types
    pub fn catalog(&self) -> InMemoryCatalog {
        self.record_types.iter().cloned().collect()
    }

    /// Sample record for previews: the record with `id`, else the first
    /// record of `record_type`, else a blank one
    pub fn sample(&self, record_type: &str, id: Option<u64>) -> Option<Record> {
        if let Some(id) = id {
            return self.records.iter().find(|r| r.id == id).cloned();
        }
        self.records
            .iter()
            .find(|r| r.record_type == record_type)
            .cloned()
            .or_else(|| self.record_type(record_type).map(|t| Record::blank(0, t)))
    }
}
