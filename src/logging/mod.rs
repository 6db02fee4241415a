//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by `RUST_LOG` or the configured level
//! - JSON-formatted local file logs with rotation
//!
//! # Example
//!
//! ```no_run
//! use labtrack::config::LoggingConfig;
//! use labtrack::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(sample_code = "LAB-2025-000001", "Sample registered");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a sample lifecycle event
///
/// # Example
///
/// ```no_run
/// use labtrack::domain::{SampleCode, SampleEvent, PatientId, SampleId, AnalysisKind};
/// use labtrack::log_transition;
/// use uuid::Uuid;
///
/// let event = SampleEvent::SampleReceived {
///     sample_id: SampleId::new(Uuid::new_v4()).unwrap(),
///     code: SampleCode::new("LAB-2025-000001").unwrap(),
///     patient_id: PatientId::new(Uuid::new_v4()).unwrap(),
///     analysis_kind: AnalysisKind::Urine,
///     occurred_at: chrono::Utc::now(),
/// };
/// log_transition!(&event);
/// ```
#[macro_export]
macro_rules! log_transition {
    ($event:expr) => {
        tracing::info!(
            event = $event.name(),
            sample_id = %$event.sample_id(),
            sample_code = %$event.code(),
            occurred_at = %$event.occurred_at(),
            "Sample transition"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use labtrack::log_error_with_context;
/// use labtrack::domain::LabError;
///
/// let error = LabError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log the outcome of a command handler
///
/// # Example
///
/// ```no_run
/// use labtrack::log_command_complete;
/// use std::time::Duration;
///
/// log_command_complete!("validate", "LAB-2025-000001", Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_command_complete {
    ($command:expr, $code:expr, $duration:expr) => {
        tracing::info!(
            command = $command,
            sample_code = %$code,
            duration_ms = $duration.as_millis() as u64,
            "Command completed"
        );
    };
}
