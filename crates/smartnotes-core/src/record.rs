//! Records and record types
//!
//! A record is a bag of named text fields belonging to exactly one record
//! type. The host application owns records; the runtime only reads them and
//! writes generated field values back.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Schema shared by a family of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Record type name (e.g., "Basic")
    pub name: String,

    /// Field names, in display order
    pub fields: Vec<String>,
}

impl RecordType {
    /// Create a new record type
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Check whether a field exists, ignoring case
    pub fn has_field(&self, field: &str) -> bool {
        self.resolve_field(field).is_some()
    }

    /// Find the case-preserved field name matching `field`, ignoring case
    pub fn resolve_field(&self, field: &str) -> Option<&str> {
        let lower = field.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.to_lowercase() == lower)
            .map(String::as_str)
    }

    /// Field name at the given ordinal
    pub fn field_at(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Lowercased field names, in order
    pub fn lowercase_fields(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.to_lowercase()).collect()
    }
}

/// A structured item with named text fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Host-assigned identifier
    #[serde(default)]
    pub id: u64,

    /// Name of the record type this record belongs to
    pub record_type: String,

    /// Field name -> value (case-preserving)
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Create an empty record of the given type
    pub fn new(id: u64, record_type: impl Into<String>) -> Self {
        Self {
            id,
            record_type: record_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a record with every field of `record_type` present and empty
    pub fn blank(id: u64, record_type: &RecordType) -> Self {
        let fields = record_type
            .fields
            .iter()
            .map(|f| (f.clone(), String::new()))
            .collect();
        Self {
            id,
            record_type: record_type.name.clone(),
            fields,
        }
    }

    /// Set a field value
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Read a field by its exact name
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Read a field, treating an absent field as empty
    pub fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Write a field value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Field values keyed by lowercased field name
    ///
    /// Two names differing only by case collide; the last one in key order wins.
    pub fn lowercase_fields(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect()
    }
}
