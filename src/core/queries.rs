//! Read-side handlers
//!
//! Queries never mutate a sample or emit events. Lookups by id and by code go
//! through the cache when one is configured; the repository stays the source
//! of truth and cache errors only produce a warning.

use crate::adapters::cache::Cache;
use crate::adapters::database::traits::SampleRepository;
use crate::adapters::document::ReportRenderer;
use crate::core::dto::SampleDto;
use crate::domain::ids::{PatientId, SampleId};
use crate::domain::sample_code::SampleCode;
use crate::domain::{LabError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Cache key of a sample looked up by id
pub fn sample_id_key(id: SampleId) -> String {
    format!("sample:id:{id}")
}

/// Cache key of a sample looked up by code
pub fn sample_code_key(code: &str) -> String {
    format!("sample:code:{code}")
}

/// Query handlers over the sample repository
pub struct SampleQueries {
    repository: Arc<dyn SampleRepository + Send + Sync>,
    reports: Arc<dyn ReportRenderer + Send + Sync>,
    cache: Option<Arc<dyn Cache + Send + Sync>>,
    cache_ttl: Duration,
}

impl SampleQueries {
    pub fn new(
        repository: Arc<dyn SampleRepository + Send + Sync>,
        reports: Arc<dyn ReportRenderer + Send + Sync>,
        cache: Option<Arc<dyn Cache + Send + Sync>>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            reports,
            cache,
            cache_ttl,
        }
    }

    /// Fetch a sample by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such sample is stored.
    pub async fn get_by_id(&self, id: SampleId) -> Result<SampleDto> {
        let key = sample_id_key(id);
        if let Some(dto) = self.cached(&key).await {
            return Ok(dto);
        }

        let sample = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| LabError::NotFound(format!("Sample {id}")))?;

        let dto = SampleDto::from(&sample);
        self.store(&key, &dto, sample.version()).await;
        Ok(dto)
    }

    /// Fetch a sample by its lab code
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` when `code` is not a lab code
    /// - `NotFound` when no such sample is stored
    pub async fn get_by_code(&self, code: &str) -> Result<SampleDto> {
        let code = SampleCode::new(code)?;
        let key = sample_code_key(code.as_str());
        if let Some(dto) = self.cached(&key).await {
            return Ok(dto);
        }

        let sample = self
            .repository
            .get_by_code(&code)
            .await?
            .ok_or_else(|| LabError::NotFound(format!("Sample {code}")))?;

        let dto = SampleDto::from(&sample);
        self.store(&key, &dto, sample.version()).await;
        Ok(dto)
    }

    /// Every sample of a patient, oldest first
    pub async fn get_by_patient(&self, patient_id: PatientId) -> Result<Vec<SampleDto>> {
        let samples = self.repository.get_by_patient(patient_id).await?;
        Ok(samples.iter().map(SampleDto::from).collect())
    }

    /// Samples with a recorded result awaiting validation
    pub async fn get_pending_validation(&self) -> Result<Vec<SampleDto>> {
        let samples = self.repository.get_pending_validation().await?;
        Ok(samples.iter().map(SampleDto::from).collect())
    }

    /// Render the report of a sample
    pub async fn generate_report(&self, id: SampleId) -> Result<Vec<u8>> {
        self.reports.generate_report(id).await
    }

    /// MIME type of [`generate_report`](Self::generate_report) output
    pub fn report_content_type(&self) -> &'static str {
        self.reports.content_type()
    }

    async fn cached(&self, key: &str) -> Option<SampleDto> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(dto) => {
                    tracing::trace!(key = key, "Cache hit");
                    Some(dto)
                }
                Err(e) => {
                    tracing::warn!(key = key, error = %e, "Discarding unreadable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = key, error = %e, "Cache lookup failed");
                None
            }
        }
    }

    /// Cache a lookup unless a command has since fenced the key
    async fn store(&self, key: &str, dto: &SampleDto, version: u64) {
        let Some(cache) = &self.cache else {
            return;
        };

        let result = match serde_json::to_value(dto) {
            Ok(value) => cache
                .set_versioned(key, value, version, self.cache_ttl)
                .await
                .map(|_| ()),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!(key = key, error = %e, "Failed to cache sample");
        }
    }
}
