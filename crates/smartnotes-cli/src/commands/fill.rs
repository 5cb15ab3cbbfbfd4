//! `fill` and `review` commands

use super::open;
use crate::cli::{FillArgs, ReviewArgs};
use crate::config::CliConfig;
use crate::notes_file::NotesFile;
use anyhow::Result;
use smartnotes_runtime::{FieldStatus, ProcessMode, ProcessReport, Record, SmartNotes};
use std::path::{Path, PathBuf};

pub async fn fill(args: FillArgs, config: &CliConfig) -> Result<()> {
    run(&args.notes, args.output, config, Some(args.overwrite)).await
}

pub async fn review(args: ReviewArgs, config: &CliConfig) -> Result<()> {
    run(&args.notes, args.output, config, None).await
}

/// `overwrite` of `None` means review mode
async fn run(
    path: &Path,
    output: Option<PathBuf>,
    config: &CliConfig,
    overwrite: Option<bool>,
) -> Result<()> {
    let mut notes = NotesFile::load(path)?;
    let smart_notes = open(config, notes.catalog())?;

    let reports = fill_notes(&smart_notes, &mut notes, overwrite).await?;
    for report in &reports {
        println!("{}", summarize(report));
    }

    let written: usize = reports.iter().map(|r| r.succeeded().len()).sum();
    if written > 0 {
        let target = output.unwrap_or_else(|| path.to_path_buf());
        notes.save(&target)?;
        tracing::info!("Wrote {} field(s) to {}", written, target.display());
    }
    Ok(())
}

/// Process every record of `notes` in place
pub async fn fill_notes(
    smart_notes: &SmartNotes,
    notes: &mut NotesFile,
    overwrite: Option<bool>,
) -> Result<Vec<ProcessReport>> {
    let hook = |record: &Record, field: &str| {
        tracing::debug!("Record {} field {} updated", record.id, field);
    };

    let reports = match overwrite {
        Some(overwrite) => {
            smart_notes
                .fill_records(&mut notes.records, overwrite, hook)
                .await?
        }
        None => {
            smart_notes
                .process_records(&mut notes.records, ProcessMode::Review, hook)
                .await?
        }
    };
    Ok(reports)
}

/// One-line summary of a report
pub fn summarize(report: &ProcessReport) -> String {
    let head = format!("record {} ({})", report.record_id, report.record_type);
    if let Some(reason) = &report.skipped_reason {
        return format!("{}: skipped, {:?}", head, reason);
    }
    if report.outcomes.is_empty() {
        return format!("{}: nothing to do", head);
    }

    let parts: Vec<String> = report
        .outcomes
        .iter()
        .map(|o| match &o.status {
            FieldStatus::Succeeded { .. } => format!("{} ok", o.field),
            FieldStatus::Failed { error } => format!("{} failed: {}", o.field, error),
            FieldStatus::Skipped { reason } => format!("{} skipped ({:?})", o.field, reason),
        })
        .collect();
    format!("{}: {}", head, parts.join("; "))
}
