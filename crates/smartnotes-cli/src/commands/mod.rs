//! Command implementations
//!
//! Each command loads what it needs, builds a [`SmartNotes`] context over the
//! settings file and the notes file's record types, and prints a summary.

mod fill;
mod preview;
mod template;

pub use fill::{fill_notes, summarize};
pub use preview::render_preview;

use crate::cli::Command;
use crate::config::{CliConfig, OverlayConfigStore};
use anyhow::Result;
use smartnotes_runtime::{
    ConfigStore, InMemoryCatalog, JsonFileConfigStore, RecordTypeCatalog, SmartNotes,
};
use std::sync::Arc;

/// Run a parsed command
pub async fn dispatch(command: Command, config: &CliConfig) -> Result<()> {
    match command {
        Command::Fill(args) => fill::fill(args, config).await,
        Command::Review(args) => fill::review(args, config).await,
        Command::SetTemplate(args) => template::set_template(args, config),
        Command::RemoveTemplate(args) => template::remove_template(args, config),
        Command::Fields(args) => template::fields(args, config),
        Command::Preview(args) => preview::preview(args, config).await,
        Command::RestoreDefaults => template::restore_defaults(config),
    }
}

/// Settings store for the configured settings file
pub fn settings_store(config: &CliConfig) -> Arc<dyn ConfigStore> {
    let mut file = JsonFileConfigStore::new(&config.settings_path);
    if let Some(defaults) = &config.defaults_path {
        file = file.with_defaults_file(defaults);
    }
    Arc::new(OverlayConfigStore::new(Arc::new(file), config.overrides()))
}

/// Build a context over the settings file and `catalog`
pub fn open(config: &CliConfig, catalog: InMemoryCatalog) -> Result<SmartNotes> {
    let catalog: Arc<dyn RecordTypeCatalog> = Arc::new(catalog);
    let mut builder = SmartNotes::builder()
        .with_catalog(catalog)
        .with_config_store(settings_store(config));
    if let Some(base_url) = &config.openai_base_url {
        builder = builder.with_openai_base_url(base_url.clone());
    }
    Ok(builder.build()?)
}
