//! Generation map
//!
//! Associates (record type, field) pairs with the template used to generate
//! that field and the kind of generator that should run it.

use crate::record::RecordType;
use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of generator a field is produced by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationType {
    /// Chat-completion text generation
    #[default]
    #[serde(rename = "ChatGPT")]
    Chat,

    /// Pronunciation audio lookup
    #[serde(rename = "Forvo Audio")]
    Audio,
}

impl GenerationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationType::Chat => "ChatGPT",
            GenerationType::Audio => "Forvo Audio",
        }
    }
}

impl fmt::Display for GenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template plus generation type for one target field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    /// Prompt template
    pub template: Template,

    /// Generator that runs the template
    #[serde(default)]
    pub generation_type: GenerationType,
}

impl FieldTemplate {
    /// Create a chat-generated field template
    pub fn new(template: impl Into<Template>) -> Self {
        Self {
            template: template.into(),
            generation_type: GenerationType::Chat,
        }
    }

    /// Set the generation type
    pub fn with_generation_type(mut self, generation_type: GenerationType) -> Self {
        self.generation_type = generation_type;
        self
    }
}

/// Templates for the fields of one record type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTypeTemplates {
    /// Target field name -> template
    #[serde(default)]
    pub fields: BTreeMap<String, FieldTemplate>,
}

impl RecordTypeTemplates {
    /// Look up a field's template, falling back to a case-insensitive match
    pub fn get(&self, field: &str) -> Option<&FieldTemplate> {
        self.fields.get(field).or_else(|| {
            let lower = field.to_lowercase();
            self.fields
                .iter()
                .find(|(k, _)| k.to_lowercase() == lower)
                .map(|(_, v)| v)
        })
    }

    /// True when `field` (any case) has a non-empty template
    pub fn is_generated(&self, field: &str) -> bool {
        self.get(field).is_some_and(|t| !t.template.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Record type name -> field -> template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMap {
    #[serde(default)]
    pub record_types: BTreeMap<String, RecordTypeTemplates>,
}

impl GenerationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template (builder form)
    pub fn with_template(
        mut self,
        record_type: impl Into<String>,
        field: impl Into<String>,
        template: FieldTemplate,
    ) -> Self {
        self.insert(record_type, field, template);
        self
    }

    /// Templates registered for a record type
    pub fn record_type(&self, record_type: &str) -> Option<&RecordTypeTemplates> {
        self.record_types.get(record_type)
    }

    /// Template for one field of a record type
    pub fn template(&self, record_type: &str, field: &str) -> Option<&FieldTemplate> {
        self.record_type(record_type).and_then(|t| t.get(field))
    }

    /// Add or replace a template
    ///
    /// An existing entry whose name differs only by case is replaced.
    pub fn insert(
        &mut self,
        record_type: impl Into<String>,
        field: impl Into<String>,
        template: FieldTemplate,
    ) -> Option<FieldTemplate> {
        let field = field.into();
        let entry = self.record_types.entry(record_type.into()).or_default();
        let previous = remove_ignoring_case(&mut entry.fields, &field);
        entry.fields.insert(field, template);
        previous
    }

    /// Remove a template; drops the record type entry once it is empty
    pub fn remove(&mut self, record_type: &str, field: &str) -> Option<FieldTemplate> {
        let entry = self.record_types.get_mut(record_type)?;
        let removed = remove_ignoring_case(&mut entry.fields, field);
        if entry.is_empty() {
            self.record_types.remove(record_type);
        }
        removed
    }

    /// If the field at `field_index` of `record_type` is generated, its name
    ///
    /// `field_index` is the field's ordinal, e.g. the editor's focused field.
    pub fn generated_field_at<'a>(
        &self,
        record_type: &'a RecordType,
        field_index: usize,
    ) -> Option<&'a str> {
        let field = record_type.field_at(field_index)?;
        let templates = self.record_type(&record_type.name)?;
        templates.is_generated(field).then_some(field)
    }

    /// Fields a template for `target_field` may reference
    ///
    /// Every field of the record type except the target and any field with
    /// an entry in the map (even an empty one), in record type order.
    pub fn referenceable_fields<'a>(
        &self,
        record_type: &'a RecordType,
        target_field: &str,
    ) -> Vec<&'a str> {
        let target = target_field.to_lowercase();
        let templates = self.record_type(&record_type.name);

        record_type
            .fields
            .iter()
            .filter(|f| f.to_lowercase() != target)
            .filter(|f| !templates.is_some_and(|t| t.get(f).is_some()))
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.record_types.is_empty()
    }
}

fn remove_ignoring_case(
    fields: &mut BTreeMap<String, FieldTemplate>,
    field: &str,
) -> Option<FieldTemplate> {
    let lower = field.to_lowercase();
    let key = fields.keys().find(|k| k.to_lowercase() == lower).cloned()?;
    fields.remove(&key)
}
