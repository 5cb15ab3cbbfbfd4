//! Template authoring commands

use super::{open, settings_store};
use crate::cli::{FieldArgs, FieldsArgs, SetTemplateArgs};
use crate::config::CliConfig;
use crate::notes_file::NotesFile;
use anyhow::Result;
use smartnotes_runtime::{FieldTemplate, GenerationType, InMemoryCatalog, Settings};

pub fn set_template(args: SetTemplateArgs, config: &CliConfig) -> Result<()> {
    let notes = NotesFile::load(&args.notes)?;
    let smart_notes = open(config, notes.catalog())?;

    let generation_type = GenerationType::from(args.generation_type);
    let template = FieldTemplate::new(args.template).with_generation_type(generation_type);
    let previous = smart_notes.set_template(&args.target.record_type, &args.target.field, template)?;

    let verb = if previous.is_some() { "Replaced" } else { "Saved" };
    println!(
        "{} {} template for {}.{}",
        verb, generation_type, args.target.record_type, args.target.field
    );
    Ok(())
}

pub fn remove_template(args: FieldArgs, config: &CliConfig) -> Result<()> {
    // Removal never needs record type schemas
    let smart_notes = open(config, InMemoryCatalog::new())?;

    match smart_notes.remove_template(&args.record_type, &args.field)? {
        Some(_) => println!("Removed template for {}.{}", args.record_type, args.field),
        None => println!("No template for {}.{}", args.record_type, args.field),
    }
    Ok(())
}

pub fn fields(args: FieldsArgs, config: &CliConfig) -> Result<()> {
    let notes = NotesFile::load(&args.notes)?;
    let smart_notes = open(config, notes.catalog())?;

    for field in smart_notes.referenceable_fields(&args.target.record_type, &args.target.field)? {
        println!("{{{{{}}}}}", field);
    }
    Ok(())
}

pub fn restore_defaults(config: &CliConfig) -> Result<()> {
    if config.defaults_path.is_none() {
        anyhow::bail!("No defaults_path configured; set SMARTNOTES_DEFAULTS_PATH");
    }
    let store = settings_store(config);
    Settings::restore_defaults(store.as_ref())?;
    println!("Restored defaults in {}", config.settings_path.display());
    Ok(())
}
