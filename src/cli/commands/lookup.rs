//! Read-only commands: `show`, `patient`, `pending` and `report`

use super::{open_service, print_sample, print_sample_table, report_failure, EXIT_OK};
use crate::adapters::document::verify_report;
use crate::domain::{PatientId, SampleId};
use anyhow::Context;
use clap::Args;
use std::fs;
use std::io::Write;
use std::str::FromStr;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Sample id (UUID) or lab code (LAB-YYYY-NNNNNN)
    pub sample: String,
}

impl ShowArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let outcome = match SampleId::from_str(&self.sample) {
            Ok(id) => service.queries().get_by_id(id).await,
            Err(_) => service.queries().get_by_code(&self.sample).await,
        };

        match outcome {
            Ok(sample) => {
                println!("🧪 Sample {}", sample.code);
                println!();
                print_sample(&sample);
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => Ok(report_failure("Lookup", &e)),
        }
    }
}

/// Arguments for the patient command
#[derive(Args, Debug)]
pub struct PatientArgs {
    /// Patient identifier (UUID)
    pub patient_id: PatientId,
}

impl PatientArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let samples = match service.queries().get_by_patient(self.patient_id).await {
            Ok(s) => s,
            Err(e) => return Ok(report_failure("Patient lookup", &e)),
        };

        if samples.is_empty() {
            println!("No samples found for patient {}.", self.patient_id);
            return Ok(EXIT_OK);
        }

        println!("Found {} sample(s) for patient {}:", samples.len(), self.patient_id);
        println!();
        print_sample_table(&samples);
        println!();
        Ok(EXIT_OK)
    }
}

/// Arguments for the pending command
#[derive(Args, Debug)]
pub struct PendingArgs {}

impl PendingArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let samples = match service.queries().get_pending_validation().await {
            Ok(s) => s,
            Err(e) => return Ok(report_failure("Pending lookup", &e)),
        };

        if samples.is_empty() {
            println!("No results awaiting validation.");
            return Ok(EXIT_OK);
        }

        println!("{} result(s) awaiting validation:", samples.len());
        println!();
        print_sample_table(&samples);
        println!();
        Ok(EXIT_OK)
    }
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Sample identifier (UUID)
    pub sample_id: SampleId,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ReportArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let report = match service.queries().generate_report(self.sample_id).await {
            Ok(r) => r,
            Err(e) => return Ok(report_failure("Report generation", &e)),
        };
        tracing::debug!(
            bytes = report.len(),
            content_type = service.queries().report_content_type(),
            verified = verify_report(&report),
            "Report rendered"
        );

        match self.output {
            Some(ref path) => {
                fs::write(path, &report)
                    .with_context(|| format!("Failed to write report to {path}"))?;
                println!("✅ Report written: {path}");
            }
            None => {
                std::io::stdout()
                    .write_all(&report)
                    .context("Failed to write report to stdout")?;
            }
        }
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookups_without_config() {
        let missing = "/nonexistent/labtrack.toml";
        let show = ShowArgs {
            sample: "LAB-2025-000001".to_string(),
        };
        assert_eq!(show.execute(missing).await.unwrap(), 2);
        assert_eq!(PendingArgs {}.execute(missing).await.unwrap(), 2);
    }
}
