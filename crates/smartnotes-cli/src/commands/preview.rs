//! `preview` command

use super::open;
use crate::cli::PreviewArgs;
use crate::config::CliConfig;
use crate::notes_file::NotesFile;
use anyhow::{anyhow, Result};
use smartnotes_runtime::{PromptPreview, Template};

pub async fn preview(args: PreviewArgs, config: &CliConfig) -> Result<()> {
    let notes = NotesFile::load(&args.notes)?;
    let sample = notes
        .sample(&args.target.record_type, args.record)
        .ok_or_else(|| match args.record {
            Some(id) => anyhow!("No record with id {}", id),
            None => anyhow!("Unknown record type {}", args.target.record_type),
        })?;
    let smart_notes = open(config, notes.catalog())?;

    let preview = smart_notes
        .preview(
            &Template::new(args.template),
            &args.target.record_type,
            &args.target.field,
            &sample,
            args.generation_type.into(),
        )
        .await?;

    print!("{}", render_preview(&preview));
    Ok(())
}

/// Human-readable preview
pub fn render_preview(preview: &PromptPreview) -> String {
    let mut out = String::new();
    out.push_str("Fields:\n");
    for (field, value) in &preview.field_values {
        out.push_str(&format!("  {}: {}\n", field, value));
    }
    out.push_str(&format!("Prompt:\n  {}\n", preview.prompt));
    out.push_str(&format!("Response:\n  {}\n", preview.response));
    out
}
