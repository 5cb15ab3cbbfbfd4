//! Smart Notes command-line tool
//!
//! Fills generated fields of records kept in a YAML/JSON notes file and
//! manages the per-field templates stored in the settings file.

use anyhow::Result;
use smartnotes_cli::cli::Cli;
use smartnotes_cli::commands;
use smartnotes_cli::config::CliConfig;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing()?;

    let cli = Cli::parse_args();

    // Load configuration
    let config = CliConfig::load()?;
    debug!("Loaded configuration: {:?}", config.redacted());

    commands::dispatch(cli.command, &config).await
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "smartnotes=info,smartnotes_cli=info,smartnotes_runtime=info,smartnotes_llm=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
