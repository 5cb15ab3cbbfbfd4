//! Template validation
//!
//! Run whenever a template is created or edited, before it is admitted into
//! the generation map. The check is pure, so the runtime may repeat it.

use super::parser::field_references;
use crate::error::{Result, TemplateError};
use crate::generation_map::GenerationMap;
use crate::record::RecordType;
use std::collections::HashSet;

/// Check that `template` is legal for `target_field` of `record_type`
///
/// References are checked in order of appearance. For each reference:
/// 1. it must name a field of the record type (`InvalidFieldReference`)
/// 2. it must not name another field with an entry in `map`, even one whose
///    template is empty (`ChainedGenerationNotAllowed`)
///
/// Then, if a target field is given, no reference may name it
/// (`SelfReferenceNotAllowed`). The target's own entry in `map` is ignored
/// by the chaining check so that editing an existing template reports a
/// self-reference rather than a chain.
pub fn validate(
    template: &str,
    record_type: &RecordType,
    map: &GenerationMap,
    target_field: Option<&str>,
) -> Result<()> {
    let record_fields: HashSet<String> = record_type.lowercase_fields().into_iter().collect();
    let target = target_field.map(str::to_lowercase);
    let generated: HashSet<String> = map
        .record_type(&record_type.name)
        .map(|t| t.fields.keys().map(|k| k.to_lowercase()).collect())
        .unwrap_or_default();

    let references: Vec<String> = field_references(template).collect();

    for field in &references {
        if !record_fields.contains(field) {
            return Err(TemplateError::InvalidFieldReference {
                field: field.clone(),
            });
        }
        if generated.contains(field) && target.as_ref() != Some(field) {
            return Err(TemplateError::ChainedGenerationNotAllowed {
                field: field.clone(),
            });
        }
    }

    if let Some(target) = target {
        if references.contains(&target) {
            return Err(TemplateError::SelfReferenceNotAllowed { field: target });
        }
    }

    Ok(())
}
