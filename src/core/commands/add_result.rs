//! Result entry

use super::{ensure_not_cancelled, CommandContext};
use crate::core::dto::SampleDto;
use crate::domain::ids::SampleId;
use crate::domain::result_value::ResultValue;
use crate::domain::Result;
use crate::log_command_complete;
use std::time::Instant;
use tokio::sync::watch;

/// Record the measured value of a sample
#[derive(Debug, Clone)]
pub struct AddResultCommand {
    pub sample_id: SampleId,
    pub value: f64,
    pub unit: String,
    pub reference_min: f64,
    pub reference_max: f64,
    pub notes: String,
}

pub struct AddResultHandler {
    context: CommandContext,
}

impl AddResultHandler {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Attach the result and move the sample to `Completed`
    ///
    /// A result entered for an already validated sample replaces the signed-off
    /// result and drops the validation; this is logged as a warning.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the sample does not exist
    /// - `InvalidArgument` for a malformed value or reference range
    /// - `Conflict` when the sample changed since it was loaded
    pub async fn handle(
        &self,
        command: AddResultCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        let started = Instant::now();
        let mut sample = self.context.load(command.sample_id).await?;
        ensure_not_cancelled(shutdown, "add_result")?;

        let value = ResultValue::new(
            command.value,
            command.unit,
            command.reference_min,
            command.reference_max,
        )?;

        if sample.result_status().is_validated() {
            tracing::warn!(
                sample_code = %sample.code(),
                result_status = %sample.result_status(),
                "Overwriting a validated result; validation is cleared"
            );
        }

        let clock = self.context.clock.clone();
        self.context
            .with_rng(|rng| sample.add_result(value, command.notes, clock.as_ref(), rng));

        ensure_not_cancelled(shutdown, "add_result")?;
        let dto = self.context.persist(sample).await?;

        log_command_complete!("add_result", dto.code, started.elapsed());
        Ok(dto)
    }
}
