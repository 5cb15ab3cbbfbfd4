//! Record type catalog
//!
//! The host application owns record types and may change them at any time,
//! so lookups go through the catalog on every call instead of being cached.

use dashmap::DashMap;
use smartnotes_core::RecordType;

/// Source of record type schemas
pub trait RecordTypeCatalog: Send + Sync {
    /// Look up a record type by name
    fn record_type(&self, name: &str) -> Option<RecordType>;

    /// All known record types, sorted by name
    fn record_types(&self) -> Vec<RecordType>;
}

/// In-memory catalog
#[derive(Default)]
pub struct InMemoryCatalog {
    types: DashMap<String, RecordType>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record type (builder form)
    pub fn with_record_type(self, record_type: RecordType) -> Self {
        self.insert(record_type);
        self
    }

    /// Add or replace a record type
    pub fn insert(&self, record_type: RecordType) {
        self.types.insert(record_type.name.clone(), record_type);
    }

    /// Remove a record type
    pub fn remove(&self, name: &str) -> Option<RecordType> {
        self.types.remove(name).map(|(_, v)| v)
    }
}

impl FromIterator<RecordType> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = RecordType>>(iter: I) -> Self {
        let catalog = Self::new();
        for record_type in iter {
            catalog.insert(record_type);
        }
        catalog
    }
}

impl RecordTypeCatalog for InMemoryCatalog {
    fn record_type(&self, name: &str) -> Option<RecordType> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    fn record_types(&self) -> Vec<RecordType> {
        let mut types: Vec<RecordType> =
            self.types.iter().map(|entry| entry.value().clone()).collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }
}
