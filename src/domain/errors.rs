//! Domain error types
//!
//! This module defines the error hierarchy for LabTrack. Domain failures are
//! typed outcomes; infrastructure failures wrap collaborator errors as strings
//! so third-party types never leak through the public API.

use thiserror::Error;

/// Main LabTrack error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum LabError {
    /// Malformed input to a value object or command
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced sample or code does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The sample result has already been validated
    #[error("Sample {0} has already been validated")]
    AlreadyValidated(String),

    /// A state-machine precondition was not met
    #[error("Sample {sample} is not ready: {reason}")]
    NotReady { sample: String, reason: String },

    /// Optimistic concurrency or uniqueness conflict at the storage boundary
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The operation was cancelled by a shutdown signal
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Report rendering errors
    #[error("Document error: {0}")]
    Document(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Response category a transport layer maps each error to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller-fixable input problem
    BadInput,
    /// The referenced resource does not exist
    MissingResource,
    /// The request conflicts with the current state
    Conflict,
    /// A collaborator is unavailable or failed
    ServiceUnavailable,
}

impl LabError {
    /// Creates a `NotReady` error for the given sample reference
    pub fn not_ready(sample: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::NotReady {
            sample: sample.into(),
            reason: reason.into(),
        }
    }

    /// Returns the response category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            LabError::InvalidArgument(_) => ErrorCategory::BadInput,
            LabError::NotFound(_) => ErrorCategory::MissingResource,
            LabError::AlreadyValidated(_) | LabError::NotReady { .. } | LabError::Conflict(_) => {
                ErrorCategory::Conflict
            }
            LabError::Cancelled(_)
            | LabError::Configuration(_)
            | LabError::Database(_)
            | LabError::Notification(_)
            | LabError::Document(_)
            | LabError::Serialization(_)
            | LabError::Io(_) => ErrorCategory::ServiceUnavailable,
        }
    }

    /// Whether the failure came from a collaborator rather than the domain
    pub fn is_infrastructure(&self) -> bool {
        self.category() == ErrorCategory::ServiceUnavailable
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LabError {
    fn from(err: std::io::Error) -> Self {
        LabError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LabError {
    fn from(err: toml::de::Error) -> Self {
        LabError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_error_display() {
        let err = LabError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = LabError::not_ready("LAB-2025-000001", "result has not been validated");
        assert_eq!(
            err.to_string(),
            "Sample LAB-2025-000001 is not ready: result has not been validated"
        );
    }

    #[test]
    fn test_error_categories_are_distinct() {
        assert_eq!(
            LabError::InvalidArgument("x".into()).category(),
            ErrorCategory::BadInput
        );
        assert_eq!(
            LabError::NotFound("x".into()).category(),
            ErrorCategory::MissingResource
        );
        assert_eq!(
            LabError::AlreadyValidated("x".into()).category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            LabError::not_ready("x", "y").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            LabError::Database("down".into()).category(),
            ErrorCategory::ServiceUnavailable
        );
        assert!(LabError::Notification("smtp".into()).is_infrastructure());
        assert!(!LabError::Conflict("version".into()).is_infrastructure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let lab_err: LabError = io_err.into();
        assert!(matches!(lab_err, LabError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let lab_err: LabError = json_err.into();
        assert!(matches!(lab_err, LabError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let lab_err: LabError = toml_err.into();
        assert!(matches!(lab_err, LabError::Configuration(_)));
        assert!(lab_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_lab_error_implements_std_error() {
        let err = LabError::InvalidArgument("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
