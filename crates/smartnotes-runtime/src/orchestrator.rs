//! Generation orchestrator
//!
//! For one record: find the templates for its record type, walk the record
//! type's fields in order, and for each eligible field interpolate its
//! template against the record as it was when the call started, dispatch the
//! prompt, and write the result back. A failed field is reported and never
//! aborts the rest of the batch.

use crate::catalog::RecordTypeCatalog;
use crate::error::{Result, RuntimeError};
use crate::generation::Generator;
use futures::future::join_all;
use smartnotes_core::{GenerationMap, GenerationType, Record, RecordType, Template, TemplateError};
use std::sync::Arc;

/// Where a generation run was triggered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// The user asked for generation while editing; regenerate everything
    Editor,

    /// A record is being shown for review; only fill empty fields
    Review,
}

impl ProcessMode {
    pub fn overwrite(&self) -> bool {
        matches!(self, ProcessMode::Editor)
    }
}

/// Why a whole record was not processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSkip {
    /// The generation map has no templates for the record's type
    NoTemplateForRecordType,

    /// The catalog does not know the record's type
    UnknownRecordType,

    /// Review-time generation is switched off
    GenerationDisabled,
}

/// Why a templated field was not dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSkip {
    /// Overwrite is off and the field already has a value
    AlreadyPopulated,

    /// The stored template no longer validates against the record type
    InvalidTemplate(TemplateError),

    /// The template targets a field the record type no longer has
    FieldMissing,
}

/// Final state of one templated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Succeeded { value: String },
    Failed { error: String },
    Skipped { reason: FieldSkip },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: String,
    pub status: FieldStatus,
}

/// Result of processing one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub record_id: u64,
    pub record_type: String,

    /// Set when the record was skipped as a whole
    pub skipped_reason: Option<RecordSkip>,

    /// One entry per templated field, in record type order
    pub outcomes: Vec<FieldOutcome>,
}

impl ProcessReport {
    /// Create an empty report for `record`
    pub fn new(record: &Record) -> Self {
        Self {
            record_id: record.id,
            record_type: record.record_type.clone(),
            skipped_reason: None,
            outcomes: Vec::new(),
        }
    }

    /// Create a report for a record skipped as a whole
    pub fn skipped(record: &Record, reason: RecordSkip) -> Self {
        Self {
            skipped_reason: Some(reason),
            ..Self::new(record)
        }
    }

    /// Names of the fields that were written
    pub fn succeeded(&self) -> Vec<&str> {
        self.fields_where(|s| matches!(s, FieldStatus::Succeeded { .. }))
    }

    /// Names of the fields whose generation failed
    pub fn failed(&self) -> Vec<&str> {
        self.fields_where(|s| matches!(s, FieldStatus::Failed { .. }))
    }

    /// Outcome for a field
    pub fn outcome(&self, field: &str) -> Option<&FieldStatus> {
        self.outcomes
            .iter()
            .find(|o| o.field == field)
            .map(|o| &o.status)
    }

    fn fields_where(&self, pred: impl Fn(&FieldStatus) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| pred(&o.status))
            .map(|o| o.field.as_str())
            .collect()
    }
}

/// A single dry run of a template against a sample record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPreview {
    /// The interpolated prompt
    pub prompt: String,

    /// Referenced field -> sample value, in order of first reference
    pub field_values: Vec<(String, String)>,

    /// What the generator returned
    pub response: String,
}

/// Stateless between calls; one instance can serve many records concurrently
#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn Generator>,
    catalog: Arc<dyn RecordTypeCatalog>,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn Generator>, catalog: Arc<dyn RecordTypeCatalog>) -> Self {
        Self { generator, catalog }
    }

    /// Generate the templated fields of one record
    ///
    /// `on_field_complete` is called once per written field, after the write.
    pub async fn process<F>(
        &self,
        record: &mut Record,
        map: &GenerationMap,
        overwrite: bool,
        mut on_field_complete: F,
    ) -> ProcessReport
    where
        F: FnMut(&Record, &str),
    {
        let templates = match map.record_type(&record.record_type) {
            Some(t) if !t.is_empty() => t,
            _ => {
                tracing::debug!(
                    "No templates for record type {}, skipping record {}",
                    record.record_type,
                    record.id
                );
                return ProcessReport::skipped(record, RecordSkip::NoTemplateForRecordType);
            }
        };

        let Some(record_type) = self.catalog.record_type(&record.record_type) else {
            tracing::warn!(
                "Unknown record type {} for record {}",
                record.record_type,
                record.id
            );
            return ProcessReport::skipped(record, RecordSkip::UnknownRecordType);
        };

        let snapshot = record.clone();
        let snapshot_values = snapshot.lowercase_fields();
        let mut report = ProcessReport::new(record);

        for field in &record_type.fields {
            let Some(field_template) = templates.get(field) else {
                continue;
            };
            if field_template.template.is_empty() {
                continue;
            }

            let current = snapshot_values
                .get(&field.to_lowercase())
                .map(String::as_str)
                .unwrap_or("");
            if !overwrite && !current.is_empty() {
                tracing::debug!("Field {} already populated, skipping", field);
                report.push(field, FieldStatus::skipped(FieldSkip::AlreadyPopulated));
                continue;
            }

            if let Err(e) = field_template
                .template
                .validate(&record_type, map, Some(field.as_str()))
            {
                tracing::warn!("Stored template for {} is invalid: {}", field, e);
                report.push(field, FieldStatus::skipped(FieldSkip::InvalidTemplate(e)));
                continue;
            }

            let prompt = field_template.template.interpolate(&snapshot);
            match self
                .generator
                .generate(&prompt, field_template.generation_type)
                .await
            {
                Ok(value) => {
                    let key = field_key(record, field);
                    record.set(key.clone(), value.clone());
                    tracing::info!("Generated {} for record {}", field, record.id);
                    on_field_complete(&*record, &key);
                    report.push(field, FieldStatus::Succeeded { value });
                }
                Err(e) => {
                    tracing::warn!(
                        "Generation failed for {} on record {}: {}",
                        field,
                        record.id,
                        e
                    );
                    report.push(
                        field,
                        FieldStatus::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }

        for field in templates.fields.keys() {
            if !record_type.has_field(field) {
                tracing::warn!(
                    "Template targets missing field {} on {}",
                    field,
                    record_type.name
                );
                report.push(field, FieldStatus::skipped(FieldSkip::FieldMissing));
            }
        }

        report
    }

    /// Process independent records concurrently
    ///
    /// Each record still runs its own sequential field loop. Reports are
    /// returned in input order.
    pub async fn process_many<F>(
        &self,
        records: &mut [Record],
        map: &GenerationMap,
        overwrite: bool,
        on_field_complete: F,
    ) -> Vec<ProcessReport>
    where
        F: Fn(&Record, &str),
    {
        let hook = &on_field_complete;
        join_all(
            records
                .iter_mut()
                .map(|record| self.process(record, map, overwrite, hook)),
        )
        .await
    }

    /// Validate, interpolate and dispatch a template without writing anything
    pub async fn preview(
        &self,
        template: &Template,
        record_type: &str,
        target_field: &str,
        sample: &Record,
        map: &GenerationMap,
        generation_type: GenerationType,
    ) -> Result<PromptPreview> {
        let rt = self
            .catalog
            .record_type(record_type)
            .ok_or_else(|| RuntimeError::UnknownRecordType(record_type.to_string()))?;
        let target = rt
            .resolve_field(target_field)
            .ok_or_else(|| RuntimeError::UnknownField {
                record_type: record_type.to_string(),
                field: target_field.to_string(),
            })?;

        template.validate(&rt, map, Some(target))?;

        let prompt = template.interpolate(sample);
        let field_values = referenced_values(template, &rt, sample);
        let response = self.generator.generate(&prompt, generation_type).await?;

        Ok(PromptPreview {
            prompt,
            field_values,
            response,
        })
    }
}

impl ProcessReport {
    fn push(&mut self, field: &str, status: FieldStatus) {
        self.outcomes.push(FieldOutcome {
            field: field.to_string(),
            status,
        });
    }
}

impl FieldStatus {
    fn skipped(reason: FieldSkip) -> Self {
        FieldStatus::Skipped { reason }
    }
}

/// The record's own key for `field`, if it has one under any case
fn field_key(record: &Record, field: &str) -> String {
    let lower = field.to_lowercase();
    record
        .fields
        .keys()
        .find(|k| k.to_lowercase() == lower)
        .cloned()
        .unwrap_or_else(|| field.to_string())
}

fn referenced_values(
    template: &Template,
    record_type: &RecordType,
    sample: &Record,
) -> Vec<(String, String)> {
    let values = sample.lowercase_fields();
    let mut out: Vec<(String, String)> = Vec::new();

    for reference in template.references() {
        let name = record_type
            .resolve_field(&reference)
            .map(str::to_string)
            .unwrap_or_else(|| reference.clone());
        if out.iter().any(|(n, _)| *n == name) {
            continue;
        }
        let value = values
            .get(&reference.to_lowercase())
            .cloned()
            .unwrap_or_default();
        out.push((name, value));
    }

    out
}
