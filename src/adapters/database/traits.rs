//! Sample storage port
//!
//! This module defines the trait that storage adapters must implement to
//! hold sample aggregates.

use crate::domain::ids::{PatientId, SampleId};
use crate::domain::sample::Sample;
use crate::domain::sample_code::SampleCode;
use crate::domain::Result;
use async_trait::async_trait;

/// Repository for sample aggregates
///
/// Implementations store the aggregate's snapshot and enforce optimistic
/// concurrency:
///
/// - [`add`](SampleRepository::add) fails with `Conflict` if the id or the
///   code is already stored
/// - [`update`](SampleRepository::update) succeeds only if the stored version
///   equals [`Sample::persisted_version`], then stores [`Sample::version`]
///
/// Loaded samples carry no pending events.
#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// Test the storage connection
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Load a sample by identity
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` when no such sample is stored.
    async fn get_by_id(&self, id: SampleId) -> Result<Option<Sample>>;

    /// Load a sample by its lab code
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` when no such sample is stored.
    async fn get_by_code(&self, code: &SampleCode) -> Result<Option<Sample>>;

    /// All samples of a patient, oldest first
    async fn get_by_patient(&self, patient_id: PatientId) -> Result<Vec<Sample>>;

    /// Samples whose status is `Completed`, oldest first
    async fn get_pending_validation(&self) -> Result<Vec<Sample>>;

    /// Store a new sample
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when the id or code already exists.
    async fn add(&self, sample: &Sample) -> Result<()>;

    /// Store the changes of a loaded sample
    ///
    /// # Errors
    ///
    /// - `NotFound` when the sample is not stored
    /// - `Conflict` when the stored version differs from the sample's persisted version
    async fn update(&self, sample: &Sample) -> Result<()>;

    /// Short backend name for logs and status output
    fn backend_name(&self) -> &'static str;
}
