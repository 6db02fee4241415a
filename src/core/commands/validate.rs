//! Doctor sign-off

use super::{ensure_not_cancelled, CommandContext};
use crate::core::dto::SampleDto;
use crate::domain::ids::{DoctorId, SampleId};
use crate::domain::Result;
use crate::log_command_complete;
use std::time::Instant;
use tokio::sync::watch;

/// Validate the recorded result of a sample
#[derive(Debug, Clone)]
pub struct ValidateResultCommand {
    pub sample_id: SampleId,
    pub doctor_id: DoctorId,
    pub notes: String,
}

pub struct ValidateResultHandler {
    context: CommandContext,
}

impl ValidateResultHandler {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Sign off the result
    ///
    /// An abnormal result raises an alert through the event dispatcher once
    /// the validation is stored.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the sample does not exist
    /// - `AlreadyValidated` when the result was signed off before
    /// - `NotReady` when no result is awaiting validation
    /// - `Conflict` when the sample changed since it was loaded
    pub async fn handle(
        &self,
        command: ValidateResultCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        let started = Instant::now();
        let mut sample = self.context.load(command.sample_id).await?;
        ensure_not_cancelled(shutdown, "validate")?;

        sample.validate(command.doctor_id, command.notes, self.context.clock.as_ref())?;

        ensure_not_cancelled(shutdown, "validate")?;
        let dto = self.context.persist(sample).await?;

        log_command_complete!("validate", dto.code, started.elapsed());
        Ok(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::traits::SampleRepository;
    use crate::core::commands::test_support::{fixture, running};
    use crate::core::commands::{
        AddResultCommand, AddResultHandler, RegisterSampleCommand, RegisterSampleHandler,
    };
    use crate::domain::analysis::AnalysisKind;
    use crate::domain::LabError;
    use uuid::Uuid;

    async fn completed(context: &CommandContext, value: f64) -> SampleId {
        let id = RegisterSampleHandler::new(context.clone())
            .handle(
                RegisterSampleCommand {
                    patient_id: Uuid::new_v4(),
                    analysis_kind: AnalysisKind::BloodCount,
                },
                &running(),
            )
            .await
            .unwrap()
            .id;

        AddResultHandler::new(context.clone())
            .handle(
                AddResultCommand {
                    sample_id: id,
                    value,
                    unit: "g/dL".to_string(),
                    reference_min: 12.0,
                    reference_max: 17.5,
                    notes: String::new(),
                },
                &running(),
            )
            .await
            .unwrap();
        id
    }

    fn command(sample_id: SampleId) -> ValidateResultCommand {
        ValidateResultCommand {
            sample_id,
            doctor_id: DoctorId::new(Uuid::new_v4()).unwrap(),
            notes: "reviewed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_validate_normal_result_sends_no_alert() {
        let fx = fixture();
        let id = completed(&fx.context, 14.0).await;

        let dto = ValidateResultHandler::new(fx.context.clone())
            .handle(command(id), &running())
            .await
            .unwrap();

        assert_eq!(dto.status, "Validated");
        assert_eq!(dto.result_status, "Validated");
        assert!(fx.sender.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validate_abnormal_result_sends_one_alert() {
        let fx = fixture();
        let id = completed(&fx.context, 9.1).await;

        let dto = ValidateResultHandler::new(fx.context.clone())
            .handle(command(id), &running())
            .await
            .unwrap();

        assert_eq!(*fx.sender.alerts.lock().unwrap(), vec![dto.code]);
    }

    #[tokio::test]
    async fn test_validate_twice_fails() {
        let fx = fixture();
        let id = completed(&fx.context, 14.0).await;
        let handler = ValidateResultHandler::new(fx.context.clone());

        handler.handle(command(id), &running()).await.unwrap();
        let err = handler.handle(command(id), &running()).await.unwrap_err();
        assert!(matches!(err, LabError::AlreadyValidated(_)));

        let stored = fx.repository.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.version(), 3);
    }

    #[tokio::test]
    async fn test_validate_without_result_is_not_ready() {
        let fx = fixture();
        let id = RegisterSampleHandler::new(fx.context.clone())
            .handle(
                RegisterSampleCommand {
                    patient_id: Uuid::new_v4(),
                    analysis_kind: AnalysisKind::Glucose,
                },
                &running(),
            )
            .await
            .unwrap()
            .id;

        let err = ValidateResultHandler::new(fx.context.clone())
            .handle(command(id), &running())
            .await
            .unwrap_err();
        assert!(matches!(err, LabError::NotReady { .. }));
    }
}
