//! Patient notification
//!
//! The message goes out before the state change: a delivery failure aborts
//! the command and the sample stays `Validated`.

use super::{ensure_not_cancelled, CommandContext};
use crate::adapters::notification::NotificationSender;
use crate::core::dto::SampleDto;
use crate::domain::email::EmailAddress;
use crate::domain::ids::SampleId;
use crate::domain::Result;
use crate::log_command_complete;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Tell the patient their validated result is ready
#[derive(Debug, Clone)]
pub struct NotifyPatientCommand {
    pub sample_id: SampleId,
    pub patient_email: EmailAddress,
    pub patient_name: String,
}

pub struct NotifyPatientHandler {
    context: CommandContext,
    notifier: Arc<dyn NotificationSender + Send + Sync>,
}

impl NotifyPatientHandler {
    pub fn new(context: CommandContext, notifier: Arc<dyn NotificationSender + Send + Sync>) -> Self {
        Self { context, notifier }
    }

    /// Send the result-ready message, then mark the sample notified
    ///
    /// # Errors
    ///
    /// - `NotFound` when the sample does not exist
    /// - `NotReady` unless the result is validated and not yet notified
    /// - `Notification` when delivery fails; nothing is stored
    /// - `Conflict` when the sample changed since it was loaded
    pub async fn handle(
        &self,
        command: NotifyPatientCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        let started = Instant::now();
        let mut sample = self.context.load(command.sample_id).await?;
        ensure_not_cancelled(shutdown, "notify")?;

        sample.ensure_notifiable()?;

        self.notifier
            .send_result_ready(&command.patient_email, &command.patient_name, sample.code())
            .await
            .inspect_err(|e| {
                tracing::error!(
                    sample_code = %sample.code(),
                    provider = self.notifier.provider_name(),
                    error = %e,
                    "Result-ready notification failed"
                );
            })?;

        sample.mark_notified(command.patient_email, self.context.clock.as_ref())?;
        let dto = self.context.persist(sample).await?;

        log_command_complete!("notify", dto.code, started.elapsed());
        Ok(dto)
    }
}
