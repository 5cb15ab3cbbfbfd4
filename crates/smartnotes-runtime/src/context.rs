//! Smart Notes context
//!
//! Explicitly constructed replacement for global config and client state.
//! Settings are re-read from the store on every call, so a generation run
//! works against the generation map as it was when the call started.

use crate::authoring::TemplateAuthoring;
use crate::catalog::RecordTypeCatalog;
use crate::config::{ConfigStore, MemoryConfigStore, Settings};
use crate::error::{Result, RuntimeError};
use crate::generation::{ChatGenerator, Generator, GeneratorRegistry};
use crate::orchestrator::{Orchestrator, ProcessMode, ProcessReport, PromptPreview, RecordSkip};
use serde_json::json;
use smartnotes_core::{FieldTemplate, GenerationMap, GenerationType, Record, Template};
use smartnotes_llm::{LLMCache, OpenAIProvider};
use std::sync::Arc;

/// Entry point for hosts embedding Smart Notes
pub struct SmartNotes {
    config: Arc<dyn ConfigStore>,
    catalog: Arc<dyn RecordTypeCatalog>,
    authoring: TemplateAuthoring,
    generator: Option<Arc<dyn Generator>>,
    extra_generators: GeneratorRegistry,
    openai_base_url: Option<String>,
    cache: Option<Arc<dyn LLMCache>>,
}

impl SmartNotes {
    pub fn builder() -> SmartNotesBuilder {
        SmartNotesBuilder::new()
    }

    // ========== Settings ==========

    /// Current settings
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(self.config.as_ref())
    }

    /// Persist settings
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.save(self.config.as_ref())
    }

    /// Count a generation run; true when the host should ask for a rating
    pub fn record_usage(&self) -> Result<bool> {
        let mut settings = self.settings()?;
        let prompt = settings.bump_usage();
        self.config.set("times_used", json!(settings.times_used))?;
        self.config
            .set("did_show_rate_dialog", json!(settings.did_show_rate_dialog))?;
        Ok(prompt)
    }

    pub fn catalog(&self) -> &Arc<dyn RecordTypeCatalog> {
        &self.catalog
    }

    // ========== Generation ==========

    /// Generate the templated fields of one record
    pub async fn process_record<F>(
        &self,
        record: &mut Record,
        mode: ProcessMode,
        on_field_complete: F,
    ) -> Result<ProcessReport>
    where
        F: FnMut(&Record, &str),
    {
        let settings = self.settings()?;

        if mode == ProcessMode::Review && !settings.generate_at_review {
            tracing::debug!("Review-time generation disabled, skipping record {}", record.id);
            return Ok(ProcessReport::skipped(record, RecordSkip::GenerationDisabled));
        }
        if !has_templates(&settings.generation_map, record) {
            return Ok(ProcessReport::skipped(
                record,
                RecordSkip::NoTemplateForRecordType,
            ));
        }

        let orchestrator = self.orchestrator(&settings)?;
        let report = orchestrator
            .process(
                record,
                &settings.generation_map,
                mode.overwrite(),
                on_field_complete,
            )
            .await;

        self.after_run(std::slice::from_ref(&report));
        Ok(report)
    }

    /// Generate the templated fields of many independent records
    pub async fn process_records<F>(
        &self,
        records: &mut [Record],
        mode: ProcessMode,
        on_field_complete: F,
    ) -> Result<Vec<ProcessReport>>
    where
        F: Fn(&Record, &str),
    {
        if mode == ProcessMode::Review && !self.settings()?.generate_at_review {
            return Ok(records
                .iter()
                .map(|r| ProcessReport::skipped(r, RecordSkip::GenerationDisabled))
                .collect());
        }
        self.fill_records(records, mode.overwrite(), on_field_complete)
            .await
    }

    /// Generate the templated fields of many records with an explicit
    /// overwrite policy, ignoring `generate_at_review`
    pub async fn fill_records<F>(
        &self,
        records: &mut [Record],
        overwrite: bool,
        on_field_complete: F,
    ) -> Result<Vec<ProcessReport>>
    where
        F: Fn(&Record, &str),
    {
        let settings = self.settings()?;

        if !records
            .iter()
            .any(|r| has_templates(&settings.generation_map, r))
        {
            return Ok(records
                .iter()
                .map(|r| ProcessReport::skipped(r, RecordSkip::NoTemplateForRecordType))
                .collect());
        }

        let orchestrator = self.orchestrator(&settings)?;
        let reports = orchestrator
            .process_many(
                records,
                &settings.generation_map,
                overwrite,
                on_field_complete,
            )
            .await;

        self.after_run(&reports);
        Ok(reports)
    }

    /// Dry-run a template against a sample record
    pub async fn preview(
        &self,
        template: &Template,
        record_type: &str,
        target_field: &str,
        sample: &Record,
        generation_type: GenerationType,
    ) -> Result<PromptPreview> {
        let settings = self.settings()?;
        self.orchestrator(&settings)?
            .preview(
                template,
                record_type,
                target_field,
                sample,
                &settings.generation_map,
                generation_type,
            )
            .await
    }

    /// Name of the generated field at `field_index` of `record`, if any
    pub fn generated_field_at(&self, record: &Record, field_index: usize) -> Result<Option<String>> {
        let record_type = self
            .catalog
            .record_type(&record.record_type)
            .ok_or_else(|| RuntimeError::UnknownRecordType(record.record_type.clone()))?;
        let settings = self.settings()?;
        Ok(settings
            .generation_map
            .generated_field_at(&record_type, field_index)
            .map(str::to_string))
    }

    // ========== Authoring ==========

    /// Validate a template and store it in the persisted generation map
    pub fn set_template(
        &self,
        record_type: &str,
        field: &str,
        template: FieldTemplate,
    ) -> Result<Option<FieldTemplate>> {
        let mut map = self.settings()?.generation_map;
        let previous = self
            .authoring
            .set_template(&mut map, record_type, field, template)?;
        self.store_map(&map)?;
        Ok(previous)
    }

    /// Remove a template from the persisted generation map
    pub fn remove_template(&self, record_type: &str, field: &str) -> Result<Option<FieldTemplate>> {
        let mut map = self.settings()?.generation_map;
        let removed = self.authoring.remove_template(&mut map, record_type, field);
        if removed.is_some() {
            self.store_map(&map)?;
        }
        Ok(removed)
    }

    /// Fields a template for `field` may reference
    pub fn referenceable_fields(&self, record_type: &str, field: &str) -> Result<Vec<String>> {
        let map = self.settings()?.generation_map;
        self.authoring.referenceable_fields(&map, record_type, field)
    }

    // ========== Internals ==========

    fn orchestrator(&self, settings: &Settings) -> Result<Orchestrator> {
        let generator: Arc<dyn Generator> = match &self.generator {
            Some(generator) => generator.clone(),
            None => Arc::new(self.default_registry(settings)?),
        };
        Ok(Orchestrator::new(generator, self.catalog.clone()))
    }

    fn default_registry(&self, settings: &Settings) -> Result<GeneratorRegistry> {
        let mut registry = self.extra_generators.clone();
        if registry.supports(GenerationType::Chat) {
            return Ok(registry);
        }

        let mut provider = OpenAIProvider::new(settings.require_api_key()?);
        if let Some(base_url) = &self.openai_base_url {
            provider = provider.with_base_url(base_url.clone());
        }
        if let Some(cache) = &self.cache {
            provider = provider.with_cache(cache.clone());
        }

        let chat = ChatGenerator::new(Arc::new(provider), settings.openai_model.as_str());
        registry.register(GenerationType::Chat, Arc::new(chat));
        Ok(registry)
    }

    fn store_map(&self, map: &GenerationMap) -> Result<()> {
        self.config.set("generation_map", serde_json::to_value(map)?)
    }

    /// Fields are already written by now; a counter failure must not hide them
    fn after_run(&self, reports: &[ProcessReport]) {
        if reports.iter().all(|r| r.succeeded().is_empty()) {
            return;
        }
        match self.record_usage() {
            Ok(true) => tracing::info!("Usage threshold reached, rating prompt due"),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to record usage: {}", e),
        }
    }
}

fn has_templates(map: &GenerationMap, record: &Record) -> bool {
    map.record_type(&record.record_type)
        .is_some_and(|t| !t.is_empty())
}

/// Builder for [`SmartNotes`]
#[derive(Default)]
pub struct SmartNotesBuilder {
    config: Option<Arc<dyn ConfigStore>>,
    catalog: Option<Arc<dyn RecordTypeCatalog>>,
    generator: Option<Arc<dyn Generator>>,
    extra_generators: GeneratorRegistry,
    openai_base_url: Option<String>,
    cache: Option<Arc<dyn LLMCache>>,
}

impl SmartNotesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings store (defaults to an empty in-memory store)
    pub fn with_config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config = Some(store);
        self
    }

    /// Record type catalog (required)
    pub fn with_catalog(mut self, catalog: Arc<dyn RecordTypeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replace the whole generation capability
    ///
    /// When set, the OpenAI key and model from settings are not used.
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Register a generator for one generation type, e.g. audio
    pub fn with_type_generator(
        mut self,
        generation_type: GenerationType,
        generator: Arc<dyn Generator>,
    ) -> Self {
        self.extra_generators.register(generation_type, generator);
        self
    }

    /// Point the built-in chat provider at another endpoint
    pub fn with_openai_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_base_url = Some(base_url.into());
        self
    }

    /// Cache responses of the built-in chat provider
    pub fn with_cache(mut self, cache: Arc<dyn LLMCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<SmartNotes> {
        let catalog = self
            .catalog
            .ok_or_else(|| RuntimeError::ConfigError("record type catalog is required".into()))?;
        let config = self
            .config
            .unwrap_or_else(|| Arc::new(MemoryConfigStore::new()));

        Ok(SmartNotes {
            config,
            authoring: TemplateAuthoring::new(catalog.clone()),
            catalog,
            generator: self.generator,
            extra_generators: self.extra_generators,
            openai_base_url: self.openai_base_url,
            cache: self.cache,
        })
    }
}
