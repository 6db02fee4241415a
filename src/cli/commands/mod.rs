//! CLI command implementations
//!
//! Every command returns its process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Fatal error |
//! | 2 | Configuration error |
//! | 3 | Bad input |
//! | 4 | Unknown sample |
//! | 5 | State conflict (not ready, already validated, concurrent update) |
//! | 6 | Storage, notification or other collaborator unavailable, or interrupted |

pub mod demo;
pub mod init;
pub mod lifecycle;
pub mod lookup;
pub mod validate;

use crate::config::load_config;
use crate::core::dto::SampleDto;
use crate::core::service::{LabService, LabServiceBuilder};
use crate::domain::{ErrorCategory, LabError};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_CONFIGURATION: i32 = 2;
pub const EXIT_BAD_INPUT: i32 = 3;
pub const EXIT_NOT_FOUND: i32 = 4;
pub const EXIT_CONFLICT: i32 = 5;
pub const EXIT_UNAVAILABLE: i32 = 6;

/// Exit code for a failed operation
pub fn exit_code(error: &LabError) -> i32 {
    if let LabError::Configuration(_) = error {
        return EXIT_CONFIGURATION;
    }
    match error.category() {
        ErrorCategory::BadInput => EXIT_BAD_INPUT,
        ErrorCategory::MissingResource => EXIT_NOT_FOUND,
        ErrorCategory::Conflict => EXIT_CONFLICT,
        ErrorCategory::ServiceUnavailable => EXIT_UNAVAILABLE,
    }
}

/// Print a failure and return its exit code
pub(crate) fn report_failure(action: &str, error: &LabError) -> i32 {
    tracing::error!(action = action, error = %error, "Command failed");
    println!("❌ {action} failed");
    println!("   Error: {error}");
    exit_code(error)
}

/// Load configuration and assemble the service
///
/// On failure the problem is printed and the exit code is returned instead.
pub(crate) async fn open_service(config_path: &str) -> Result<LabService, i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            println!("❌ Failed to load configuration file");
            println!("   Error: {e}");
            return Err(EXIT_CONFIGURATION);
        }
    };

    let builder = match LabServiceBuilder::from_config(&config).await {
        Ok(b) => b,
        Err(e) => {
            println!("❌ Failed to initialize services");
            println!("   Error: {e}");
            return Err(exit_code(&e));
        }
    };

    builder.build().map_err(|e| {
        println!("❌ Failed to initialize services");
        println!("   Error: {e}");
        exit_code(&e)
    })
}

/// Print one sample as a key/value block
pub(crate) fn print_sample(sample: &SampleDto) {
    println!("  Code:          {}", sample.code);
    println!("  Sample ID:     {}", sample.id);
    println!("  Patient ID:    {}", sample.patient_id);
    println!("  Analysis:      {}", sample.analysis_kind);
    println!("  Status:        {}", sample.status);
    println!("  Result Status: {}", sample.result_status);
    println!(
        "  Received:      {}",
        sample.received_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(ref result) = sample.result {
        println!(
            "  Result:        {} {} ({}, range {} - {})",
            result.value, result.unit, result.status, result.reference_min, result.reference_max
        );
        if !result.notes.is_empty() {
            println!("  Notes:         {}", result.notes);
        }
    }
}

/// Print samples as a table
pub(crate) fn print_sample_table(samples: &[SampleDto]) {
    println!(
        "{:<16} {:<12} {:<11} {:<10} {:<18} {:<20}",
        "Code", "Analysis", "Status", "Result", "Value", "Received"
    );
    println!("{}", "-".repeat(92));

    for sample in samples {
        let value = match sample.result {
            Some(ref r) => format!("{} {}", r.value, r.unit),
            None => "-".to_string(),
        };
        println!(
            "{:<16} {:<12} {:<11} {:<10} {:<18} {:<20}",
            sample.code,
            sample.analysis_kind,
            sample.status,
            sample.result_status,
            value,
            sample.received_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(LabError::InvalidArgument("x".into()), EXIT_BAD_INPUT ; "bad input")]
    #[test_case(LabError::NotFound("x".into()), EXIT_NOT_FOUND ; "not found")]
    #[test_case(LabError::AlreadyValidated("x".into()), EXIT_CONFLICT ; "already validated")]
    #[test_case(LabError::not_ready("x", "y"), EXIT_CONFLICT ; "not ready")]
    #[test_case(LabError::Conflict("x".into()), EXIT_CONFLICT ; "conflict")]
    #[test_case(LabError::Configuration("x".into()), EXIT_CONFIGURATION ; "configuration")]
    #[test_case(LabError::Database("x".into()), EXIT_UNAVAILABLE ; "database")]
    #[test_case(LabError::Notification("x".into()), EXIT_UNAVAILABLE ; "notification")]
    #[test_case(LabError::Cancelled("x".into()), EXIT_UNAVAILABLE ; "cancelled")]
    fn test_exit_code(error: LabError, expected: i32) {
        assert_eq!(exit_code(&error), expected);
    }

    #[test]
    fn test_each_category_has_its_own_exit_code() {
        let codes = [
            exit_code(&LabError::InvalidArgument("x".into())),
            exit_code(&LabError::NotFound("x".into())),
            exit_code(&LabError::Conflict("x".into())),
            exit_code(&LabError::Io("x".into())),
            EXIT_CONFIGURATION,
            EXIT_FATAL,
            EXIT_OK,
        ];
        let mut unique = codes.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }

    #[tokio::test]
    async fn test_open_service_missing_config() {
        let code = open_service("/nonexistent/labtrack.toml").await.err();
        assert_eq!(code, Some(EXIT_CONFIGURATION));
    }
}
