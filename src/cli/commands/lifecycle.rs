//! Lifecycle commands
//!
//! `register`, `add-result`, `validate`, `notify` and `reject`. Each one runs
//! a single command handler and prints the resulting sample.

use super::{open_service, print_sample, report_failure, EXIT_OK};
use crate::core::commands::{
    AddResultCommand, NotifyPatientCommand, RegisterSampleCommand, RejectSampleCommand,
    ValidateResultCommand,
};
use crate::core::dto::SampleDto;
use crate::domain::{AnalysisKind, DoctorId, EmailAddress, Result, SampleId};
use clap::Args;
use tokio::sync::watch;
use uuid::Uuid;

fn finish(action: &str, outcome: Result<SampleDto>) -> i32 {
    match outcome {
        Ok(sample) => {
            println!("✅ {action}");
            println!();
            print_sample(&sample);
            println!();
            EXIT_OK
        }
        Err(e) => report_failure(action, &e),
    }
}

/// Arguments for the register command
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Patient identifier (UUID)
    #[arg(long)]
    pub patient_id: Uuid,

    /// Analysis kind (BloodCount, Glucose, Cholesterol, Thyroid, Urine, Hiv,
    /// HepatitisB, HepatitisC, Covid19)
    #[arg(long)]
    pub analysis: AnalysisKind,
}

impl RegisterArgs {
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let outcome = service
            .register_sample(
                RegisterSampleCommand {
                    patient_id: self.patient_id,
                    analysis_kind: self.analysis,
                },
                &shutdown_signal,
            )
            .await;
        Ok(finish("Sample registered", outcome))
    }
}

/// Arguments for the add-result command
#[derive(Args, Debug)]
pub struct AddResultArgs {
    /// Sample identifier (UUID)
    pub sample_id: SampleId,

    /// Measured value
    #[arg(long, allow_hyphen_values = true)]
    pub value: f64,

    /// Unit of the value, e.g. mmol/L
    #[arg(long)]
    pub unit: String,

    /// Lower bound of the reference range
    #[arg(long, allow_hyphen_values = true)]
    pub min: f64,

    /// Upper bound of the reference range
    #[arg(long, allow_hyphen_values = true)]
    pub max: f64,

    /// Free-text remarks
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddResultArgs {
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let outcome = service
            .add_result(
                AddResultCommand {
                    sample_id: self.sample_id,
                    value: self.value,
                    unit: self.unit.clone(),
                    reference_min: self.min,
                    reference_max: self.max,
                    notes: self.notes.clone(),
                },
                &shutdown_signal,
            )
            .await;
        Ok(finish("Result recorded", outcome))
    }
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateResultArgs {
    /// Sample identifier (UUID)
    pub sample_id: SampleId,

    /// Validating doctor (UUID)
    #[arg(long)]
    pub doctor_id: DoctorId,

    /// Validation remarks
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl ValidateResultArgs {
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let outcome = service
            .validate_result(
                ValidateResultCommand {
                    sample_id: self.sample_id,
                    doctor_id: self.doctor_id,
                    notes: self.notes.clone(),
                },
                &shutdown_signal,
            )
            .await;
        Ok(finish("Result validated", outcome))
    }
}

/// Arguments for the notify command
#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Sample identifier (UUID)
    pub sample_id: SampleId,

    /// Patient e-mail address
    #[arg(long)]
    pub email: EmailAddress,

    /// Patient display name
    #[arg(long)]
    pub name: String,
}

impl NotifyArgs {
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let outcome = service
            .notify_patient(
                NotifyPatientCommand {
                    sample_id: self.sample_id,
                    patient_email: self.email.clone(),
                    patient_name: self.name.clone(),
                },
                &shutdown_signal,
            )
            .await;
        Ok(finish("Patient notified", outcome))
    }
}

/// Arguments for the reject command
#[derive(Args, Debug)]
pub struct RejectArgs {
    /// Sample identifier (UUID)
    pub sample_id: SampleId,

    /// Why the sample cannot be processed
    #[arg(long)]
    pub reason: String,
}

impl RejectArgs {
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let outcome = service
            .reject_sample(
                RejectSampleCommand {
                    sample_id: self.sample_id,
                    reason: self.reason.clone(),
                },
                &shutdown_signal,
            )
            .await;
        Ok(finish("Sample rejected", outcome))
    }
}
