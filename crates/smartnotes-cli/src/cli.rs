//! CLI argument parsing
//!
//! Command structure only; implementations live in `commands`.

use clap::{Parser, Subcommand, ValueEnum};
use smartnotes_runtime::GenerationType;
use std::path::PathBuf;

/// Smart Notes: fill record fields from per-field prompt templates.
#[derive(Parser, Debug)]
#[command(name = "smartnotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate every templated field of every record in a notes file.
    ///
    /// Without `--overwrite` only empty fields are generated.
    Fill(FillArgs),

    /// Fill empty generated fields as a review session would.
    ///
    /// Does nothing when `generate_at_review` is off in settings.
    Review(ReviewArgs),

    /// Validate a template and store it in settings.
    SetTemplate(SetTemplateArgs),

    /// Remove a stored template.
    RemoveTemplate(FieldArgs),

    /// List the fields a template for the target field may reference.
    Fields(FieldsArgs),

    /// Run a template once against a sample record without saving anything.
    Preview(PreviewArgs),

    /// Reset the settings file to the shipped defaults.
    ///
    /// Uses the file named by `defaults_path` in configuration.
    RestoreDefaults,
}

#[derive(Parser, Debug)]
pub struct FillArgs {
    /// Notes file (YAML or JSON).
    pub notes: PathBuf,

    /// Regenerate fields that already have a value.
    #[arg(long)]
    pub overwrite: bool,

    /// Write the updated notes here instead of back to the input file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Notes file (YAML or JSON).
    pub notes: PathBuf,

    /// Write the updated notes here instead of back to the input file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A record type and one of its fields.
#[derive(Parser, Debug)]
pub struct FieldArgs {
    #[arg(long)]
    pub record_type: String,

    /// Target field.
    #[arg(long)]
    pub field: String,
}

#[derive(Parser, Debug)]
pub struct SetTemplateArgs {
    /// Notes file declaring the record types.
    pub notes: PathBuf,

    #[command(flatten)]
    pub target: FieldArgs,

    /// Prompt template, e.g. "Translate {{Front}} to English".
    #[arg(long)]
    pub template: String,

    #[arg(long, value_enum, default_value_t = GenerationTypeArg::Chat)]
    pub generation_type: GenerationTypeArg,
}

#[derive(Parser, Debug)]
pub struct FieldsArgs {
    /// Notes file declaring the record types.
    pub notes: PathBuf,

    #[command(flatten)]
    pub target: FieldArgs,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Notes file declaring the record types and sample records.
    pub notes: PathBuf,

    #[command(flatten)]
    pub target: FieldArgs,

    #[arg(long)]
    pub template: String,

    /// Sample record id; defaults to the first record of the record type.
    #[arg(long)]
    pub record: Option<u64>,

    #[arg(long, value_enum, default_value_t = GenerationTypeArg::Chat)]
    pub generation_type: GenerationTypeArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationTypeArg {
    Chat,
    Audio,
}

impl From<GenerationTypeArg> for GenerationType {
    fn from(arg: GenerationTypeArg) -> Self {
        match arg {
            GenerationTypeArg::Chat => GenerationType::Chat,
            GenerationTypeArg::Audio => GenerationType::Audio,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_fill() {
        let cli = Cli::try_parse_from(["smartnotes", "fill", "notes.yaml", "--overwrite"]).unwrap();
        if let Command::Fill(args) = cli.command {
            assert_eq!(args.notes, PathBuf::from("notes.yaml"));
            assert!(args.overwrite);
            assert!(args.output.is_none());
        } else {
            panic!("Expected Fill command");
        }
    }

    #[test]
    fn parse_set_template() {
        let cli = Cli::try_parse_from([
            "smartnotes",
            "set-template",
            "notes.json",
            "--record-type",
            "Basic",
            "--field",
            "Back",
            "--template",
            "Translate {{Front}}",
            "--generation-type",
            "audio",
        ])
        .unwrap();
        if let Command::SetTemplate(args) = cli.command {
            assert_eq!(args.target.record_type, "Basic");
            assert_eq!(args.target.field, "Back");
            assert_eq!(args.template, "Translate {{Front}}");
            assert_eq!(
                GenerationType::from(args.generation_type),
                GenerationType::Audio
            );
        } else {
            panic!("Expected SetTemplate command");
        }
    }

    #[test]
    fn parse_remove_template_needs_target() {
        assert!(Cli::try_parse_from(["smartnotes", "remove-template", "--field", "Back"]).is_err());

        let cli = Cli::try_parse_from([
            "smartnotes",
            "remove-template",
            "--record-type",
            "Basic",
            "--field",
            "Back",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::RemoveTemplate(_)));
    }

    #[test]
    fn parse_restore_defaults() {
        let cli = Cli::try_parse_from(["smartnotes", "restore-defaults"]).unwrap();
        assert!(matches!(cli.command, Command::RestoreDefaults));
    }

    #[test]
    fn parse_preview_defaults_to_chat() {
        let cli = Cli::try_parse_from([
            "smartnotes",
            "preview",
            "notes.yaml",
            "--record-type",
            "Basic",
            "--field",
            "Back",
            "--template",
            "{{Front}}",
        ])
        .unwrap();
        if let Command::Preview(args) = cli.command {
            assert_eq!(args.generation_type, GenerationTypeArg::Chat);
            assert!(args.record.is_none());
        } else {
            panic!("Expected Preview command");
        }
    }
}
