//! Unit tests for the generation orchestrator

use async_trait::async_trait;
use smartnotes_llm::MockProvider;
use smartnotes_runtime::{
    ChatGenerator, FieldSkip, FieldStatus, FieldTemplate, GenerationMap, GenerationType,
    Generator, GeneratorRegistry, InMemoryCatalog, Orchestrator, Record, RecordSkip, RecordType,
    Result,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Generator that records every request and echoes the prompt back
#[derive(Default)]
struct EchoGenerator {
    requests: Mutex<Vec<(String, GenerationType)>>,
}

impl EchoGenerator {
    fn requests(&self) -> Vec<(String, GenerationType)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str, generation_type: GenerationType) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), generation_type));
        Ok(format!("<{}>", prompt))
    }
}

fn card_type() -> RecordType {
    RecordType::new(
        "Card",
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
    )
}

fn catalog() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::new().with_record_type(card_type()))
}

fn shared_source_map() -> GenerationMap {
    GenerationMap::new()
        .with_template("Card", "A", FieldTemplate::new("first {{C}}"))
        .with_template("Card", "B", FieldTemplate::new("second {{c}}"))
}

#[tokio::test]
async fn test_no_template_for_record_type_is_benign_skip() {
    let generator = Arc::new(EchoGenerator::default());
    let orch = Orchestrator::new(generator.clone(), catalog());
    let mut record = Record::blank(1, &card_type()).with_field("C", "x");
    let before = record.clone();

    let report = orch
        .process(&mut record, &GenerationMap::new(), true, |_, _| {})
        .await;

    assert_eq!(
        report.skipped_reason,
        Some(RecordSkip::NoTemplateForRecordType)
    );
    assert!(report.outcomes.is_empty());
    assert_eq!(record, before);
    assert!(generator.requests().is_empty());
}

#[tokio::test]
async fn test_overwrite_false_never_dispatches_populated_fields() {
    let generator = Arc::new(EchoGenerator::default());
    let orch = Orchestrator::new(generator.clone(), catalog());
    let mut record = Record::blank(1, &card_type())
        .with_field("A", "kept")
        .with_field("C", "x");

    let report = orch
        .process(&mut record, &shared_source_map(), false, |_, _| {})
        .await;

    assert_eq!(record.value("A"), "kept");
    assert_eq!(record.value("B"), "<second x>");
    assert_eq!(
        report.outcome("A"),
        Some(&FieldStatus::Skipped {
            reason: FieldSkip::AlreadyPopulated
        })
    );
    assert_eq!(
        generator.requests(),
        vec![("second x".to_string(), GenerationType::Chat)]
    );
}

#[tokio::test]
async fn test_overwrite_true_regenerates_populated_fields() {
    let generator = Arc::new(EchoGenerator::default());
    let orch = Orchestrator::new(generator.clone(), catalog());
    let mut record = Record::blank(1, &card_type())
        .with_field("A", "old")
        .with_field("B", "old")
        .with_field("C", "x");

    let report = orch
        .process(&mut record, &shared_source_map(), true, |_, _| {})
        .await;

    assert_eq!(report.succeeded(), vec!["A", "B"]);
    assert_eq!(record.value("A"), "<first x>");
    assert_eq!(record.value("B"), "<second x>");
}

#[tokio::test]
async fn test_fields_interpolate_against_pre_batch_snapshot() {
    let generator = Arc::new(EchoGenerator::default());
    let orch = Orchestrator::new(generator.clone(), catalog());
    let mut record = Record::blank(1, &card_type()).with_field("C", "original");

    orch.process(&mut record, &shared_source_map(), true, |_, _| {})
        .await;

    let prompts: Vec<String> = generator.requests().into_iter().map(|(p, _)| p).collect();
    assert_eq!(prompts, vec!["first original", "second original"]);
    assert_eq!(record.value("C"), "original");
}

#[tokio::test]
async fn test_partial_failure_does_not_abort_batch() {
    let provider = MockProvider::new()
        .fail_on("first", "rate limited")
        .respond_to("second", "ok");
    let generator = Arc::new(ChatGenerator::new(Arc::new(provider), "gpt-4o"));
    let orch = Orchestrator::new(generator, catalog());
    let mut record = Record::blank(1, &card_type()).with_field("C", "x");

    let report = orch
        .process(&mut record, &shared_source_map(), true, |_, _| {})
        .await;

    assert_eq!(report.failed(), vec!["A"]);
    assert_eq!(report.succeeded(), vec!["B"]);
    assert_eq!(record.value("A"), "");
    assert_eq!(record.value("B"), "ok");
    match report.outcome("A") {
        Some(FieldStatus::Failed { error }) => assert!(error.contains("rate limited")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_hook_fires_once_per_successful_field() {
    let provider = MockProvider::new().fail_on("first", "boom");
    let generator = Arc::new(ChatGenerator::new(Arc::new(provider), "gpt-4o"));
    let orch = Orchestrator::new(generator, catalog());
    let mut record = Record::blank(1, &card_type()).with_field("C", "x");

    let mut completed = Vec::new();
    orch.process(&mut record, &shared_source_map(), true, |r, field| {
        completed.push((field.to_string(), r.value(field).to_string()));
    })
    .await;

    assert_eq!(
        completed,
        vec![("B".to_string(), "Mock LLM response".to_string())]
    );
}

#[tokio::test]
async fn test_audio_without_registered_generator_fails_field() {
    let chat = Arc::new(ChatGenerator::new(
        Arc::new(MockProvider::with_response("text")),
        "gpt-4o",
    ));
    let registry = GeneratorRegistry::new().with_generator(GenerationType::Chat, chat);
    let orch = Orchestrator::new(Arc::new(registry), catalog());

    let map = GenerationMap::new()
        .with_template("Card", "A", FieldTemplate::new("say {{C}}"))
        .with_template(
            "Card",
            "B",
            FieldTemplate::new("pronounce {{C}}").with_generation_type(GenerationType::Audio),
        );
    let mut record = Record::blank(1, &card_type()).with_field("C", "perro");

    let report = orch.process(&mut record, &map, true, |_, _| {}).await;

    assert_eq!(report.succeeded(), vec!["A"]);
    assert_eq!(report.failed(), vec!["B"]);
    assert_eq!(record.value("B"), "");
}

#[tokio::test]
async fn test_generation_type_is_forwarded() {
    let generator = Arc::new(EchoGenerator::default());
    let orch = Orchestrator::new(generator.clone(), catalog());
    let map = GenerationMap::new().with_template(
        "Card",
        "B",
        FieldTemplate::new("{{C}}").with_generation_type(GenerationType::Audio),
    );
    let mut record = Record::blank(1, &card_type()).with_field("C", "gato");

    orch.process(&mut record, &map, false, |_, _| {}).await;

    assert_eq!(
        generator.requests(),
        vec![("gato".to_string(), GenerationType::Audio)]
    );
}

#[tokio::test]
async fn test_stale_template_is_skipped_not_dispatched() {
    let generator = Arc::new(EchoGenerator::default());
    let orch = Orchestrator::new(generator.clone(), catalog());
    // Written straight into the map, bypassing authoring
    let map = GenerationMap::new().with_template("Card", "A", FieldTemplate::new("{{Gone}}"));
    let mut record = Record::blank(1, &card_type());

    let report = orch.process(&mut record, &map, true, |_, _| {}).await;

    assert!(matches!(
        report.outcome("A"),
        Some(FieldStatus::Skipped {
            reason: FieldSkip::InvalidTemplate(_)
        })
    ));
    assert!(generator.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_process_many_runs_records_concurrently() {
    let provider = MockProvider::new().delay_on("first", "done", Duration::from_secs(10));
    let generator = Arc::new(ChatGenerator::new(Arc::new(provider), "gpt-4o"));
    let orch = Orchestrator::new(generator, catalog());
    let map = GenerationMap::new().with_template("Card", "A", FieldTemplate::new("first {{C}}"));

    let mut records: Vec<Record> = (1..=3)
        .map(|id| Record::blank(id, &card_type()).with_field("C", id.to_string()))
        .collect();

    let completed = Mutex::new(Vec::new());
    let start = tokio::time::Instant::now();
    let reports = orch
        .process_many(&mut records, &map, false, |r, _| {
            completed.lock().unwrap().push(r.id);
        })
        .await;

    assert!(start.elapsed() < Duration::from_secs(20));
    assert_eq!(
        reports.iter().map(|r| r.record_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(records.iter().all(|r| r.value("A") == "done"));
    assert_eq!(completed.lock().unwrap().len(), 3);
}
