//! Integration tests for CLI commands against temp files

use smartnotes_cli::commands::{fill_notes, render_preview, settings_store, summarize};
use smartnotes_cli::{CliConfig, NotesFile};
use smartnotes_llm::MockProvider;
use smartnotes_runtime::{
    ChatGenerator, FieldTemplate, GenerationType, PromptPreview, RecordSkip, Settings, SmartNotes,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const NOTES: &str = r#"
record_types:
  - name: Basic
    fields: [Front, Back]
records:
  - id: 1
    record_type: Basic
    fields:
      Front: perro
  - id: 2
    record_type: Basic
    fields:
      Front: gato
      Back: cat
  - id: 3
    record_type: Cloze
    fields:
      Text: "{{c1::uno}}"
"#;

fn config_in(dir: &Path) -> CliConfig {
    CliConfig {
        settings_path: dir.join("smartnotes.json"),
        ..CliConfig::default()
    }
}

fn context(config: &CliConfig, notes: &NotesFile, provider: MockProvider) -> SmartNotes {
    SmartNotes::builder()
        .with_catalog(Arc::new(notes.catalog()))
        .with_config_store(settings_store(config))
        .with_generator(Arc::new(ChatGenerator::new(Arc::new(provider), "gpt-4o")))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fill_then_save_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let notes_path = dir.path().join("notes.yaml");
    fs::write(&notes_path, NOTES).unwrap();
    let config = config_in(dir.path());

    let mut notes = NotesFile::load(&notes_path).unwrap();
    let smart_notes = context(&config, &notes, MockProvider::new().respond_to("perro", "dog"));
    smart_notes
        .set_template("Basic", "Back", FieldTemplate::new("Translate {{Front}}"))
        .unwrap();

    let reports = fill_notes(&smart_notes, &mut notes, Some(false)).await.unwrap();

    assert_eq!(reports[0].succeeded(), vec!["Back"]);
    assert!(reports[1].succeeded().is_empty());
    assert_eq!(
        reports[2].skipped_reason,
        Some(RecordSkip::NoTemplateForRecordType)
    );
    assert_eq!(summarize(&reports[0]), "record 1 (Basic): Back ok");
    assert_eq!(
        summarize(&reports[1]),
        "record 2 (Basic): Back skipped (AlreadyPopulated)"
    );

    notes.save(&notes_path).unwrap();
    let reloaded = NotesFile::load(&notes_path).unwrap();
    assert_eq!(reloaded.records[0].value("Back"), "dog");
    assert_eq!(reloaded.records[1].value("Back"), "cat");
}

#[tokio::test]
async fn test_review_mode_honours_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(
        &config.settings_path,
        r#"{"generate_at_review": false, "generation_map": {"record_types": {"Basic": {"fields": {"Back": {"template": "{{Front}}"}}}}}}"#,
    )
    .unwrap();

    let mut notes: NotesFile = serde_yaml::from_str(NOTES).unwrap();
    let smart_notes = context(&config, &notes, MockProvider::new());

    let reports = fill_notes(&smart_notes, &mut notes, None).await.unwrap();
    assert!(reports
        .iter()
        .all(|r| r.skipped_reason == Some(RecordSkip::GenerationDisabled)));
    assert_eq!(notes.records[0].value("Back"), "");
}

#[test]
fn test_api_key_override_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig {
        openai_api_key: Some("sk-env".to_string()),
        ..config_in(dir.path())
    };
    let notes: NotesFile = serde_yaml::from_str(NOTES).unwrap();
    let smart_notes = context(&config, &notes, MockProvider::new());

    assert_eq!(smart_notes.settings().unwrap().openai_api_key, "sk-env");
    smart_notes
        .set_template(
            "Basic",
            "Back",
            FieldTemplate::new("{{Front}}").with_generation_type(GenerationType::Audio),
        )
        .unwrap();

    let on_disk = fs::read_to_string(&config.settings_path).unwrap();
    assert!(!on_disk.contains("sk-env"));
    assert!(on_disk.contains("Forvo Audio"));
}

#[test]
fn test_restore_defaults_from_defaults_file() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = dir.path().join("defaults.json");
    fs::write(&defaults, r#"{"times_used": 0, "openai_model": "gpt-4o"}"#).unwrap();
    let config = CliConfig {
        defaults_path: Some(defaults),
        ..config_in(dir.path())
    };
    fs::write(
        &config.settings_path,
        r#"{"times_used": 12, "openai_model": "gpt-4"}"#,
    )
    .unwrap();

    let store = settings_store(&config);
    let settings = Settings::restore_defaults(store.as_ref()).unwrap();
    assert_eq!(settings.times_used, 0);
    assert_eq!(settings.openai_model.as_str(), "gpt-4o");
}

#[test]
fn test_render_preview() {
    let preview = PromptPreview {
        prompt: "Translate perro".to_string(),
        field_values: vec![("Front".to_string(), "perro".to_string())],
        response: "dog".to_string(),
    };
    assert_eq!(
        render_preview(&preview),
        "Fields:\n  Front: perro\nPrompt:\n  Translate perro\nResponse:\n  dog\n"
    );
}
