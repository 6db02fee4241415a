//! PostgreSQL adapter implementing the sample repository
//!
//! Optimistic concurrency is enforced in SQL: updates carry the expected
//! version in their `WHERE` clause and a zero row count is a conflict.

use crate::adapters::database::traits::SampleRepository;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{PostgreSQLSample, SAMPLE_COLUMNS};
use crate::domain::ids::{PatientId, SampleId};
use crate::domain::sample::{Sample, SampleStatus};
use crate::domain::sample_code::SampleCode;
use crate::domain::{LabError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Row;
use uuid::Uuid;

/// PostgreSQL implementation of [`SampleRepository`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    fn rows_to_samples(rows: Vec<Row>) -> Result<Vec<Sample>> {
        rows.iter()
            .map(|row| PostgreSQLSample::from_row(row)?.into_domain())
            .collect()
    }

    async fn fetch_one(
        &self,
        filter: &str,
        param: &(dyn tokio_postgres::types::ToSql + Sync),
    ) -> Result<Option<Sample>> {
        let query = format!("SELECT {SAMPLE_COLUMNS} FROM samples WHERE {filter}");
        let rows = self.client.query(&query, &[param]).await?;
        match rows.first() {
            Some(row) => Ok(Some(PostgreSQLSample::from_row(row)?.into_domain()?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SampleRepository for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn get_by_id(&self, id: SampleId) -> Result<Option<Sample>> {
        let id: Uuid = id.into_inner();
        self.fetch_one("id = $1", &id).await
    }

    async fn get_by_code(&self, code: &SampleCode) -> Result<Option<Sample>> {
        let code = code.as_str();
        self.fetch_one("code = $1", &code).await
    }

    async fn get_by_patient(&self, patient_id: PatientId) -> Result<Vec<Sample>> {
        let query = format!(
            "SELECT {SAMPLE_COLUMNS} FROM samples WHERE patient_id = $1 ORDER BY received_at, code"
        );
        let patient: Uuid = patient_id.into_inner();
        let rows = self.client.query(&query, &[&patient]).await?;
        Self::rows_to_samples(rows)
    }

    async fn get_pending_validation(&self) -> Result<Vec<Sample>> {
        let query = format!(
            "SELECT {SAMPLE_COLUMNS} FROM samples WHERE status = $1 ORDER BY received_at, code"
        );
        let status = SampleStatus::Completed.as_str();
        let rows = self.client.query(&query, &[&status]).await?;
        Self::rows_to_samples(rows)
    }

    async fn add(&self, sample: &Sample) -> Result<()> {
        let row = PostgreSQLSample::from_domain(sample)?;

        let insert = r#"
            INSERT INTO samples (
                id, code, patient_id, analysis_kind, status, result_status,
                received_at, version, document
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT DO NOTHING
        "#;

        let inserted = self
            .client
            .execute(
                insert,
                &[
                    &row.id,
                    &row.code,
                    &row.patient_id,
                    &row.analysis_kind,
                    &row.status,
                    &row.result_status,
                    &row.received_at,
                    &row.version,
                    &row.document,
                ],
            )
            .await?;

        if inserted == 0 {
            return Err(LabError::Conflict(format!(
                "Sample {} or code {} already exists",
                row.id, row.code
            )));
        }

        tracing::debug!(sample_code = %row.code, version = row.version, "Sample inserted");
        Ok(())
    }

    async fn update(&self, sample: &Sample) -> Result<()> {
        let row = PostgreSQLSample::from_domain(sample)?;
        let expected = i64::try_from(sample.persisted_version()).map_err(|_| {
            LabError::Database(format!(
                "Version {} exceeds BIGINT",
                sample.persisted_version()
            ))
        })?;

        let update = r#"
            UPDATE samples SET
                status = $3,
                result_status = $4,
                version = $5,
                document = $6,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
        "#;

        let updated = self
            .client
            .execute(
                update,
                &[
                    &row.id,
                    &expected,
                    &row.status,
                    &row.result_status,
                    &row.version,
                    &row.document,
                ],
            )
            .await?;

        if updated == 0 {
            let rows = self
                .client
                .query("SELECT version FROM samples WHERE id = $1", &[&row.id])
                .await?;
            return match rows.first() {
                None => Err(LabError::NotFound(format!("Sample {} not found", row.id))),
                Some(found) => {
                    let stored: i64 = found.try_get("version").map_err(|e| {
                        LabError::Database(format!("Failed to read sample version: {e}"))
                    })?;
                    Err(LabError::Conflict(format!(
                        "Sample {} was modified concurrently (stored version {}, expected {})",
                        row.code, stored, expected
                    )))
                }
            };
        }

        tracing::debug!(sample_code = %row.code, version = row.version, "Sample updated");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}
