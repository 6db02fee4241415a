//! Command handlers
//!
//! One handler per use case. Every handler follows the same sequence:
//!
//! 1. Load the sample (`NotFound` if missing)
//! 2. Check the shutdown signal
//! 3. Run one aggregate operation
//! 4. Check the shutdown signal again
//! 5. Persist with `update` (`add` for registration)
//! 6. Drain the events, dispatch them and invalidate cached lookups
//! 7. Return the [`SampleDto`]
//!
//! A failed persist leaves the events undrained, so nothing is dispatched for
//! a change that never reached storage.

pub mod add_result;
pub mod notify;
pub mod register;
pub mod reject;
pub mod validate;

pub use add_result::{AddResultCommand, AddResultHandler};
pub use notify::{NotifyPatientCommand, NotifyPatientHandler};
pub use register::{RegisterSampleCommand, RegisterSampleHandler};
pub use reject::{RejectSampleCommand, RejectSampleHandler};
pub use validate::{ValidateResultCommand, ValidateResultHandler};

use crate::adapters::cache::Cache;
use crate::adapters::database::traits::SampleRepository;
use crate::core::dto::SampleDto;
use crate::core::events::EventDispatcher;
use crate::core::queries::{sample_code_key, sample_id_key};
use crate::domain::clock::Clock;
use crate::domain::ids::SampleId;
use crate::domain::sample::Sample;
use crate::domain::{LabError, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Randomness source shared by all handlers
///
/// Only locked inside synchronous sections, never across an `.await`.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Create an entropy-seeded [`SharedRng`]
pub fn shared_rng() -> SharedRng {
    Arc::new(Mutex::new(StdRng::from_entropy()))
}

/// Create a deterministic [`SharedRng`] for reproducible runs
pub fn seeded_rng(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(StdRng::seed_from_u64(seed)))
}

/// Ports and collaborators every handler needs
#[derive(Clone)]
pub struct CommandContext {
    pub repository: Arc<dyn SampleRepository + Send + Sync>,
    pub dispatcher: Arc<EventDispatcher>,
    pub cache: Option<Arc<dyn Cache + Send + Sync>>,
    /// Lifetime of the fences left on cached lookups
    pub cache_ttl: Duration,
    pub clock: Arc<dyn Clock>,
    pub rng: SharedRng,
}

impl CommandContext {
    /// Run `f` with exclusive access to the shared randomness source
    pub(crate) fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *rng)
    }

    /// Load a sample or fail with `NotFound`
    pub(crate) async fn load(&self, sample_id: SampleId) -> Result<Sample> {
        self.repository
            .get_by_id(sample_id)
            .await?
            .ok_or_else(|| LabError::NotFound(format!("Sample {sample_id}")))
    }

    /// Store a newly created sample, then publish its events
    pub(crate) async fn persist_new(&self, sample: Sample) -> Result<SampleDto> {
        self.repository.add(&sample).await?;
        Ok(self.commit(sample).await)
    }

    /// Store the changes of a loaded sample, then publish its events
    pub(crate) async fn persist(&self, sample: Sample) -> Result<SampleDto> {
        self.repository.update(&sample).await?;
        Ok(self.commit(sample).await)
    }

    async fn commit(&self, mut sample: Sample) -> SampleDto {
        let events = sample.take_events();
        let outcome = self.dispatcher.dispatch(&events).await;
        tracing::debug!(
            sample_code = %sample.code(),
            events = outcome.events,
            alerts_sent = outcome.alerts_sent,
            alerts_failed = outcome.alerts_failed,
            "Events dispatched"
        );

        self.invalidate(&sample).await;
        SampleDto::from(&sample)
    }

    async fn invalidate(&self, sample: &Sample) {
        let Some(cache) = &self.cache else {
            return;
        };

        for key in [sample_id_key(sample.id()), sample_code_key(sample.code().as_str())] {
            if let Err(e) = cache.fence(&key, sample.version(), self.cache_ttl).await {
                tracing::warn!(key = %key, error = %e, "Failed to invalidate cache entry");
            }
        }
    }
}

/// Fail with `Cancelled` once the shutdown signal is set
pub(crate) fn ensure_not_cancelled(shutdown: &watch::Receiver<bool>, operation: &str) -> Result<()> {
    if *shutdown.borrow() {
        tracing::warn!(operation = operation, "Shutdown requested, aborting command");
        return Err(LabError::Cancelled(operation.to_string()));
    }
    Ok(())
}
