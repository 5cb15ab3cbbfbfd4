//! Key-value configuration stores

use crate::error::{Result, RuntimeError};
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Opaque key-value store for settings
///
/// Keys are top-level setting names; values are arbitrary JSON.
pub trait ConfigStore: Send + Sync {
    /// Read a value, `None` if the key is not set
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a value
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Shipped default values, if the store knows them
    fn defaults(&self) -> Result<Option<Map<String, Value>>> {
        Ok(None)
    }
}

/// In-memory store, mainly for tests and embedding
#[derive(Default)]
pub struct MemoryConfigStore {
    values: DashMap<String, Value>,
    defaults: Option<Map<String, Value>>,
}

impl MemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with (and remembering) default values
    pub fn with_defaults(defaults: Map<String, Value>) -> Self {
        let values = defaults
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            values,
            defaults: Some(defaults),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn defaults(&self) -> Result<Option<Map<String, Value>>> {
        Ok(self.defaults.clone())
    }
}

/// Store backed by a single JSON object on disk
///
/// The file is read on every `get` and rewritten on every `set`, so edits
/// made by other processes are picked up. A missing file reads as empty.
pub struct JsonFileConfigStore {
    path: PathBuf,
    defaults_path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl JsonFileConfigStore {
    /// Create a store for the JSON file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults_path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Read shipped defaults from a second JSON file
    pub fn with_defaults_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.defaults_path = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(path: &Path) -> Result<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(RuntimeError::ConfigError(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
        }
    }

    fn write_object(&self, object: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(object)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(Self::read_object(&self.path)?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut object = Self::read_object(&self.path)?;
        object.insert(key.to_string(), value);
        self.write_object(&object)
    }

    fn defaults(&self) -> Result<Option<Map<String, Value>>> {
        match &self.defaults_path {
            Some(path) if path.exists() => Ok(Some(Self::read_object(path)?)),
            _ => Ok(None),
        }
    }
}
