//! Plain-text report renderer
//!
//! The last line of every report is `SHA-256: <hex>`, the digest of all
//! bytes before that line. [`verify_report`] checks it.

use super::ReportRenderer;
use crate::adapters::database::traits::SampleRepository;
use crate::domain::clock::Clock;
use crate::domain::ids::SampleId;
use crate::domain::sample::Sample;
use crate::domain::{LabError, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::Arc;

const CHECKSUM_PREFIX: &str = "SHA-256: ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Renders sample reports as plain text
pub struct TextReportRenderer {
    repository: Arc<dyn SampleRepository + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl TextReportRenderer {
    pub fn new(repository: Arc<dyn SampleRepository + Send + Sync>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn render(&self, sample: &Sample) -> std::result::Result<String, std::fmt::Error> {
        let mut out = String::new();
        let field = |out: &mut String, label: &str, value: &dyn std::fmt::Display| {
            writeln!(out, "{:<18}{}", format!("{label}:"), value)
        };

        writeln!(out, "LABTRACK LABORATORY REPORT")?;
        writeln!(out, "{}", "=".repeat(60))?;
        field(&mut out, "Sample code", sample.code())?;
        field(&mut out, "Sample id", &sample.id())?;
        field(&mut out, "Patient id", &sample.patient_id())?;
        field(
            &mut out,
            "Analysis",
            &format!(
                "{} ({})",
                sample.analysis_kind().label(),
                sample.analysis_kind()
            ),
        )?;
        field(
            &mut out,
            "Received",
            &sample.received_at().format(TIMESTAMP_FORMAT),
        )?;
        field(&mut out, "Status", &sample.status())?;
        field(&mut out, "Result status", &sample.result_status())?;

        writeln!(out)?;
        writeln!(out, "RESULT")?;
        writeln!(out, "{}", "-".repeat(60))?;
        match sample.result() {
            Some(result) => {
                let value = result.value();
                field(&mut out, "Value", &format!("{} {}", value.value(), value.unit()))?;
                field(
                    &mut out,
                    "Reference range",
                    &format!(
                        "{} - {} {}",
                        value.reference_min(),
                        value.reference_max(),
                        value.unit()
                    ),
                )?;
                field(&mut out, "Classification", &value.status())?;
                field(
                    &mut out,
                    "Completed",
                    &result.completed_at().format(TIMESTAMP_FORMAT),
                )?;
                if !result.notes().is_empty() {
                    field(&mut out, "Notes", &result.notes())?;
                }
            }
            None => writeln!(out, "No result recorded.")?,
        }

        if let Some(validation) = sample.validation() {
            writeln!(out)?;
            writeln!(out, "VALIDATION")?;
            writeln!(out, "{}", "-".repeat(60))?;
            field(&mut out, "Validated by", &validation.doctor_id)?;
            field(
                &mut out,
                "Validated at",
                &validation.validated_at.format(TIMESTAMP_FORMAT),
            )?;
            if !validation.notes.is_empty() {
                field(&mut out, "Notes", &validation.notes)?;
            }
        }

        if let Some(notified_at) = sample.notified_at() {
            field(&mut out, "Patient notified", &notified_at.format(TIMESTAMP_FORMAT))?;
        }

        if let Some(reason) = sample.rejection_reason() {
            writeln!(out)?;
            writeln!(out, "REJECTED: {reason}")?;
        }

        writeln!(out, "{}", "=".repeat(60))?;
        field(&mut out, "Generated", &self.clock.now().format(TIMESTAMP_FORMAT))?;
        Ok(out)
    }
}

/// Hex-encoded SHA-256 of `data`
fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Check the integrity footer of a rendered report
///
/// Returns `false` when the footer is missing or does not match the body.
pub fn verify_report(report: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(report) else {
        return false;
    };
    let trimmed = text.strip_suffix('\n').unwrap_or(text);
    let Some(split) = trimmed.rfind('\n') else {
        return false;
    };
    let (body, footer) = trimmed.split_at(split + 1);
    match footer.strip_prefix(CHECKSUM_PREFIX) {
        Some(expected) => checksum(body.as_bytes()) == expected,
        None => false,
    }
}

#[async_trait]
impl ReportRenderer for TextReportRenderer {
    async fn generate_report(&self, sample_id: SampleId) -> Result<Vec<u8>> {
        let sample = self
            .repository
            .get_by_id(sample_id)
            .await?
            .ok_or_else(|| LabError::NotFound(format!("Sample {sample_id} not found")))?;

        let mut body = self
            .render(&sample)
            .map_err(|e| LabError::Document(format!("Failed to render report: {e}")))?;
        let digest = checksum(body.as_bytes());
        body.push_str(CHECKSUM_PREFIX);
        body.push_str(&digest);
        body.push('\n');

        tracing::debug!(sample_code = %sample.code(), checksum = %digest, "Report rendered");
        Ok(body.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}
