//! Explicit settings struct
//!
//! Every setting is a top-level key in the [`ConfigStore`]. Keys missing
//! from the store take their value from [`Settings::default`].

use super::store::ConfigStore;
use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smartnotes_core::GenerationMap;
use smartnotes_llm::OpenAIModel;

/// Uses after which the host may ask for a rating, once
pub const USES_BEFORE_RATE_PROMPT: u32 = 10;

/// Smart Notes settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// OpenAI API key
    pub openai_api_key: String,

    /// Forvo API key, used by audio generators
    pub forvo_api_key: String,

    /// Chat model used for text generation
    pub openai_model: OpenAIModel,

    /// Fill empty generated fields when a card is shown for review
    pub generate_at_review: bool,

    /// Number of generation runs so far
    pub times_used: u32,

    /// Whether the rating prompt has already been shown
    pub did_show_rate_dialog: bool,

    /// Last version whose release notes were seen
    pub last_seen_version: Option<String>,

    /// Anonymous installation id
    pub uuid: Option<String>,

    /// Per record type, per field templates
    pub generation_map: GenerationMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            forvo_api_key: String::new(),
            openai_model: OpenAIModel::default(),
            generate_at_review: true,
            times_used: 0,
            did_show_rate_dialog: false,
            last_seen_version: None,
            uuid: None,
            generation_map: GenerationMap::default(),
        }
    }
}

impl Settings {
    /// Read settings from a store
    pub fn load(store: &dyn ConfigStore) -> Result<Self> {
        let mut object = match serde_json::to_value(Settings::default())? {
            Value::Object(object) => object,
            _ => return Err(RuntimeError::ConfigError("settings must be an object".into())),
        };

        for (key, value) in object.iter_mut() {
            if let Some(stored) = store.get(key)? {
                *value = stored;
            }
        }

        serde_json::from_value(Value::Object(object)).map_err(|e| {
            RuntimeError::ConfigError(format!("Failed to deserialize settings: {}", e))
        })
    }

    /// Write every setting to a store
    pub fn save(&self, store: &dyn ConfigStore) -> Result<()> {
        match serde_json::to_value(self)? {
            Value::Object(object) => {
                for (key, value) in object {
                    store.set(&key, value)?;
                }
                Ok(())
            }
            _ => Err(RuntimeError::ConfigError("settings must be an object".into())),
        }
    }

    /// Overwrite stored settings with the store's shipped defaults
    ///
    /// A store without defaults is left untouched. Returns the settings as
    /// loaded afterwards.
    pub fn restore_defaults(store: &dyn ConfigStore) -> Result<Self> {
        if let Some(defaults) = store.defaults()? {
            for (key, value) in defaults {
                store.set(&key, value)?;
            }
        }
        Self::load(store)
    }

    /// The OpenAI API key, or `MissingApiKey` if unset
    pub fn require_api_key(&self) -> Result<&str> {
        if self.openai_api_key.trim().is_empty() {
            return Err(RuntimeError::MissingApiKey);
        }
        Ok(&self.openai_api_key)
    }

    /// Count one generation run
    ///
    /// Returns true exactly once: the first time the count passes
    /// [`USES_BEFORE_RATE_PROMPT`] while the rating prompt has not been shown.
    pub fn bump_usage(&mut self) -> bool {
        self.times_used = self.times_used.saturating_add(1);
        if self.times_used > USES_BEFORE_RATE_PROMPT && !self.did_show_rate_dialog {
            self.did_show_rate_dialog = true;
            return true;
        }
        false
    }
}
