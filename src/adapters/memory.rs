//! In-memory sample repository
//!
//! Holds snapshots in a process-local map. Used for development, tests, and
//! single-process CLI sessions.

use crate::adapters::database::traits::SampleRepository;
use crate::domain::ids::{PatientId, SampleId};
use crate::domain::sample::{Sample, SampleSnapshot, SampleStatus};
use crate::domain::sample_code::SampleCode;
use crate::domain::{LabError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Store {
    samples: HashMap<SampleId, SampleSnapshot>,
    codes: HashMap<SampleCode, SampleId>,
}

/// Sample repository backed by a `tokio::sync::RwLock`
#[derive(Default)]
pub struct InMemorySampleRepository {
    store: RwLock<Store>,
}

impl InMemorySampleRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored samples
    pub async fn len(&self) -> usize {
        self.store.read().await.samples.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn sorted(mut snapshots: Vec<SampleSnapshot>) -> Result<Vec<Sample>> {
        snapshots.sort_by(|a, b| {
            a.received_at
                .cmp(&b.received_at)
                .then_with(|| a.code.as_str().cmp(b.code.as_str()))
        });
        snapshots.into_iter().map(Sample::restore).collect()
    }
}

#[async_trait]
impl SampleRepository for InMemorySampleRepository {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn get_by_id(&self, id: SampleId) -> Result<Option<Sample>> {
        let store = self.store.read().await;
        store
            .samples
            .get(&id)
            .cloned()
            .map(Sample::restore)
            .transpose()
    }

    async fn get_by_code(&self, code: &SampleCode) -> Result<Option<Sample>> {
        let store = self.store.read().await;
        store
            .codes
            .get(code)
            .and_then(|id| store.samples.get(id))
            .cloned()
            .map(Sample::restore)
            .transpose()
    }

    async fn get_by_patient(&self, patient_id: PatientId) -> Result<Vec<Sample>> {
        let store = self.store.read().await;
        let matching = store
            .samples
            .values()
            .filter(|s| s.patient_id == patient_id)
            .cloned()
            .collect();
        Self::sorted(matching)
    }

    async fn get_pending_validation(&self) -> Result<Vec<Sample>> {
        let store = self.store.read().await;
        let matching = store
            .samples
            .values()
            .filter(|s| s.status == SampleStatus::Completed)
            .cloned()
            .collect();
        Self::sorted(matching)
    }

    async fn add(&self, sample: &Sample) -> Result<()> {
        let mut store = self.store.write().await;

        if store.samples.contains_key(&sample.id()) {
            return Err(LabError::Conflict(format!(
                "Sample {} already exists",
                sample.id()
            )));
        }
        if store.codes.contains_key(sample.code()) {
            return Err(LabError::Conflict(format!(
                "Sample code {} is already in use",
                sample.code()
            )));
        }

        store.codes.insert(sample.code().clone(), sample.id());
        store.samples.insert(sample.id(), sample.snapshot());
        Ok(())
    }

    async fn update(&self, sample: &Sample) -> Result<()> {
        let mut store = self.store.write().await;

        let stored = store
            .samples
            .get_mut(&sample.id())
            .ok_or_else(|| LabError::NotFound(format!("Sample {} not found", sample.id())))?;

        if stored.version != sample.persisted_version() {
            return Err(LabError::Conflict(format!(
                "Sample {} was modified concurrently (stored version {}, expected {})",
                sample.code(),
                stored.version,
                sample.persisted_version()
            )));
        }

        *stored = sample.snapshot();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
