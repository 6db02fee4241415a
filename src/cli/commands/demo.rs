//! Demo command implementation
//!
//! Walks one sample through the whole lifecycle inside a single process, which
//! makes the in-memory backend usable from the command line.

use super::{open_service, print_sample, report_failure, EXIT_OK};
use crate::core::commands::{
    AddResultCommand, NotifyPatientCommand, RegisterSampleCommand, ValidateResultCommand,
};
use crate::core::service::LabService;
use crate::domain::{AnalysisKind, DoctorId, EmailAddress, Result};
use clap::Args;
use tokio::sync::watch;
use uuid::Uuid;

/// Arguments for the demo command
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Analysis kind of the demo sample
    #[arg(long, default_value = "Glucose")]
    pub analysis: AnalysisKind,

    /// Measured value
    #[arg(long, default_value_t = 7.4, allow_hyphen_values = true)]
    pub value: f64,

    /// Unit of the value
    #[arg(long, default_value = "mmol/L")]
    pub unit: String,

    /// Lower bound of the reference range
    #[arg(long, default_value_t = 3.9, allow_hyphen_values = true)]
    pub min: f64,

    /// Upper bound of the reference range
    #[arg(long, default_value_t = 6.1, allow_hyphen_values = true)]
    pub max: f64,

    /// Patient e-mail address for the result-ready message
    #[arg(long, default_value = "patient@example.org")]
    pub email: EmailAddress,

    /// Patient display name
    #[arg(long, default_value = "Demo Patient")]
    pub name: String,
}

impl DemoArgs {
    /// Execute the demo command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(analysis = %self.analysis, "Running lifecycle demo");

        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        println!("🧪 LabTrack lifecycle demo");
        println!("   Storage: {}", service.backend_name());
        println!("   Notifications: {}", service.provider_name());
        println!();

        match self.run(&service, &shutdown_signal).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report_failure("Demo", &e)),
        }
    }

    async fn run(&self, service: &LabService, shutdown: &watch::Receiver<bool>) -> Result<()> {
        let registered = service
            .register_sample(
                RegisterSampleCommand {
                    patient_id: Uuid::new_v4(),
                    analysis_kind: self.analysis,
                },
                shutdown,
            )
            .await?;
        println!("1. Registered {}", registered.code);

        let completed = service
            .add_result(
                AddResultCommand {
                    sample_id: registered.id,
                    value: self.value,
                    unit: self.unit.clone(),
                    reference_min: self.min,
                    reference_max: self.max,
                    notes: "demo run".to_string(),
                },
                shutdown,
            )
            .await?;
        if let Some(ref result) = completed.result {
            println!("2. Result {} {} ({})", result.value, result.unit, result.status);
        }

        service
            .validate_result(
                ValidateResultCommand {
                    sample_id: registered.id,
                    doctor_id: DoctorId::new(Uuid::new_v4())?,
                    notes: "demo sign-off".to_string(),
                },
                shutdown,
            )
            .await?;
        println!("3. Validated");

        let notified = service
            .notify_patient(
                NotifyPatientCommand {
                    sample_id: registered.id,
                    patient_email: self.email.clone(),
                    patient_name: self.name.clone(),
                },
                shutdown,
            )
            .await?;
        println!("4. Notified {}", self.email);
        println!();
        print_sample(&notified);
        println!();

        let report = service.queries().generate_report(registered.id).await?;
        println!("{}", String::from_utf8_lossy(&report));
        Ok(())
    }
}
