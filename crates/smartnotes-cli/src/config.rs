//! CLI configuration
//!
//! Process-level settings for the binary, separate from the Smart Notes
//! settings file it edits. Read from `config/smartnotes.*` when present and
//! from `SMARTNOTES_*` environment variables (including a `.env` file).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smartnotes_runtime::{ConfigStore, Result as RuntimeResult};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Smart Notes settings file
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Shipped defaults used by `restore_defaults`
    #[serde(default)]
    pub defaults_path: Option<PathBuf>,

    /// OpenAI key used instead of the one in the settings file
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Alternative OpenAI-compatible endpoint
    #[serde(default)]
    pub openai_base_url: Option<String>,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("smartnotes.json")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            defaults_path: None,
            openai_api_key: None,
            openai_base_url: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/smartnotes").required(false))
            .add_source(config::Environment::with_prefix("SMARTNOTES"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Copy with secrets masked, for logging
    pub fn redacted(&self) -> Self {
        Self {
            openai_api_key: self.openai_api_key.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }

    /// Values that take precedence over the settings file without being
    /// written to it
    pub fn overrides(&self) -> Map<String, Value> {
        let mut overrides = Map::new();
        if let Some(key) = self.openai_api_key.as_ref().filter(|k| !k.is_empty()) {
            overrides.insert("openai_api_key".to_string(), Value::String(key.clone()));
        }
        overrides
    }
}

/// Config store that answers some keys from process configuration
///
/// Writes always go to the inner store, so overridden values never end up
/// in the settings file.
pub struct OverlayConfigStore {
    inner: Arc<dyn ConfigStore>,
    overrides: Map<String, Value>,
}

impl OverlayConfigStore {
    pub fn new(inner: Arc<dyn ConfigStore>, overrides: Map<String, Value>) -> Self {
        Self { inner, overrides }
    }
}

impl ConfigStore for OverlayConfigStore {
    fn get(&self, key: &str) -> RuntimeResult<Option<Value>> {
        match self.overrides.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.inner.get(key),
        }
    }

    fn set(&self, key: &str, value: Value) -> RuntimeResult<()> {
        self.inner.set(key, value)
    }

    fn defaults(&self) -> RuntimeResult<Option<Map<String, Value>>> {
        self.inner.defaults()
    }
}
