//! Sample rejection

use super::{ensure_not_cancelled, CommandContext};
use crate::core::dto::SampleDto;
use crate::domain::ids::SampleId;
use crate::domain::{LabError, Result};
use crate::log_command_complete;
use std::time::Instant;
use tokio::sync::watch;

/// Reject a sample, e.g. for a haemolysed or mislabelled tube
#[derive(Debug, Clone)]
pub struct RejectSampleCommand {
    pub sample_id: SampleId,
    pub reason: String,
}

pub struct RejectSampleHandler {
    context: CommandContext,
}

impl RejectSampleHandler {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Move the sample to `Rejected`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a blank reason
    /// - `NotFound` when the sample does not exist
    /// - `Conflict` when the sample changed since it was loaded
    pub async fn handle(
        &self,
        command: RejectSampleCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        let started = Instant::now();
        let reason = command.reason.trim();
        if reason.is_empty() {
            return Err(LabError::InvalidArgument(
                "Rejection reason cannot be empty".to_string(),
            ));
        }

        let mut sample = self.context.load(command.sample_id).await?;
        ensure_not_cancelled(shutdown, "reject")?;

        sample.reject(reason);
        tracing::info!(sample_code = %sample.code(), reason = reason, "Sample rejected");

        ensure_not_cancelled(shutdown, "reject")?;
        let dto = self.context.persist(sample).await?;

        log_command_complete!("reject", dto.code, started.elapsed());
        Ok(dto)
    }
}
