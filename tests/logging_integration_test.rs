//! Integration tests for logging functionality
//!
//! A global subscriber can only be installed once per process, so a single
//! test installs it and the others stay on paths that fail before installing.

use labtrack::adapters::memory::InMemorySampleRepository;
use labtrack::config::LoggingConfig;
use labtrack::core::commands::RegisterSampleCommand;
use labtrack::core::service::LabServiceBuilder;
use labtrack::domain::{AnalysisKind, LabError};
use labtrack::logging::init_logging;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;
use uuid::Uuid;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("never-created");
    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let err = init_logging("chatty", &config).unwrap_err();
    assert!(matches!(err, LabError::Configuration(_)));
    assert!(!log_path.exists());
}

#[tokio::test]
async fn test_transitions_are_written_to_json_log_file() {
    std::env::remove_var("RUST_LOG");
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");
    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).unwrap();
    assert!(guard.has_file_output());

    let service = LabServiceBuilder::new()
        .repository(Arc::new(InMemorySampleRepository::new()))
        .build()
        .unwrap();
    let (_tx, rx) = watch::channel(false);
    let sample = service
        .register_sample(
            RegisterSampleCommand {
                patient_id: Uuid::new_v4(),
                analysis_kind: AnalysisKind::Covid19,
            },
            &rx,
        )
        .await
        .unwrap();

    // Dropping the guard flushes the background writer
    drop(guard);

    let contents = std::fs::read_to_string(log_path.join("labtrack.log")).unwrap();
    let transition = contents
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|entry| entry["fields"]["message"] == "Sample transition")
        .expect("transition entry in log file");

    assert_eq!(transition["level"], "INFO");
    assert_eq!(transition["fields"]["event"], "SampleReceived");
    assert_eq!(transition["fields"]["sample_code"], sample.code.as_str());
    assert!(contents.contains("Command completed"));
}
