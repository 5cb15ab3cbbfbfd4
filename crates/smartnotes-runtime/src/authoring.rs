//! Template authoring
//!
//! Templates enter the generation map only through here. The record type is
//! fetched from the catalog on every call and the template is validated
//! before the map is touched; on error the map is left unchanged.

use crate::catalog::RecordTypeCatalog;
use crate::error::{Result, RuntimeError};
use smartnotes_core::{FieldTemplate, GenerationMap, RecordType};
use std::sync::Arc;

/// Validating editor for a generation map
#[derive(Clone)]
pub struct TemplateAuthoring {
    catalog: Arc<dyn RecordTypeCatalog>,
}

impl TemplateAuthoring {
    pub fn new(catalog: Arc<dyn RecordTypeCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve the record type and the case-preserved target field name
    fn resolve(&self, record_type: &str, field: &str) -> Result<(RecordType, String)> {
        let rt = self
            .catalog
            .record_type(record_type)
            .ok_or_else(|| RuntimeError::UnknownRecordType(record_type.to_string()))?;
        let field = rt
            .resolve_field(field)
            .ok_or_else(|| RuntimeError::UnknownField {
                record_type: record_type.to_string(),
                field: field.to_string(),
            })?
            .to_string();
        Ok((rt, field))
    }

    /// Validate a template for `field` of `record_type` without storing it
    pub fn check(
        &self,
        map: &GenerationMap,
        record_type: &str,
        field: &str,
        template: &FieldTemplate,
    ) -> Result<()> {
        let (rt, field) = self.resolve(record_type, field)?;
        template.template.validate(&rt, map, Some(&field))?;
        Ok(())
    }

    /// Validate and admit a template, returning the one it replaced
    pub fn set_template(
        &self,
        map: &mut GenerationMap,
        record_type: &str,
        field: &str,
        template: FieldTemplate,
    ) -> Result<Option<FieldTemplate>> {
        let (rt, field) = self.resolve(record_type, field)?;
        template.template.validate(&rt, map, Some(&field))?;

        tracing::info!(
            "Set {} template for {}.{}",
            template.generation_type,
            rt.name,
            field
        );
        Ok(map.insert(rt.name, field, template))
    }

    /// Remove a template
    pub fn remove_template(
        &self,
        map: &mut GenerationMap,
        record_type: &str,
        field: &str,
    ) -> Option<FieldTemplate> {
        let removed = map.remove(record_type, field);
        if removed.is_some() {
            tracing::info!("Removed template for {}.{}", record_type, field);
        }
        removed
    }

    /// Fields a template for `field` may reference
    pub fn referenceable_fields(
        &self,
        map: &GenerationMap,
        record_type: &str,
        field: &str,
    ) -> Result<Vec<String>> {
        let (rt, field) = self.resolve(record_type, field)?;
        Ok(map
            .referenceable_fields(&rt, &field)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}
