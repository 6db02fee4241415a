//! Sample intake

use super::{ensure_not_cancelled, CommandContext};
use crate::core::dto::SampleDto;
use crate::domain::analysis::AnalysisKind;
use crate::domain::sample::Sample;
use crate::domain::Result;
use crate::log_command_complete;
use std::time::Instant;
use tokio::sync::watch;
use uuid::Uuid;

/// Register a new sample for a patient
#[derive(Debug, Clone)]
pub struct RegisterSampleCommand {
    pub patient_id: Uuid,
    pub analysis_kind: AnalysisKind,
}

pub struct RegisterSampleHandler {
    context: CommandContext,
}

impl RegisterSampleHandler {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Create the sample and store it with `add`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for the nil patient id
    /// - `Conflict` when the generated id or code is already stored
    /// - `Cancelled` when shutdown was requested before the sample was stored
    pub async fn handle(
        &self,
        command: RegisterSampleCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        let started = Instant::now();
        ensure_not_cancelled(shutdown, "register")?;

        let clock = self.context.clock.clone();
        let sample = self.context.with_rng(|rng| {
            Sample::create(command.patient_id, command.analysis_kind, clock.as_ref(), rng)
        })?;

        ensure_not_cancelled(shutdown, "register")?;
        let dto = self.context.persist_new(sample).await?;

        log_command_complete!("register", dto.code, started.elapsed());
        Ok(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::traits::SampleRepository;
    use crate::core::commands::test_support::{fixture, running, stopped};
    use crate::domain::LabError;

    #[tokio::test]
    async fn test_register_stores_received_sample() {
        let fx = fixture();
        let handler = RegisterSampleHandler::new(fx.context.clone());

        let dto = handler
            .handle(
                RegisterSampleCommand {
                    patient_id: Uuid::new_v4(),
                    analysis_kind: AnalysisKind::Glucose,
                },
                &running(),
            )
            .await
            .unwrap();

        assert_eq!(dto.status, "Received");
        assert_eq!(dto.result_status, "Pending");
        assert!(dto.code.starts_with("LAB-2025-"));

        let stored = fx.repository.get_by_id(dto.id).await.unwrap().unwrap();
        assert_eq!(stored.version(), 1);
        assert!(stored.pending_events().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_nil_patient() {
        let fx = fixture();
        let handler = RegisterSampleHandler::new(fx.context.clone());

        let err = handler
            .handle(
                RegisterSampleCommand {
                    patient_id: Uuid::nil(),
                    analysis_kind: AnalysisKind::Urine,
                },
                &running(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LabError::InvalidArgument(_)));
        assert!(fx.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_cancelled_stores_nothing() {
        let fx = fixture();
        let handler = RegisterSampleHandler::new(fx.context.clone());

        let err = handler
            .handle(
                RegisterSampleCommand {
                    patient_id: Uuid::new_v4(),
                    analysis_kind: AnalysisKind::Urine,
                },
                &stopped(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LabError::Cancelled(_)));
        assert!(fx.repository.is_empty().await);
    }
}
