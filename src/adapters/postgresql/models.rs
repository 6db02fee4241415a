//! PostgreSQL row models
//!
//! This module defines the row structure used when storing samples in the
//! `samples` table.

use crate::domain::sample::{Sample, SampleSnapshot};
use crate::domain::{LabError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;
use uuid::Uuid;

/// Column list shared by every `SELECT` on the samples table
pub const SAMPLE_COLUMNS: &str =
    "id, code, patient_id, analysis_kind, status, result_status, received_at, version, document";

/// Sample row for PostgreSQL storage
///
/// This structure maps to the `samples` table. The lookup columns duplicate
/// fields of `document`, which holds the full snapshot.
#[derive(Debug, Clone)]
pub struct PostgreSQLSample {
    /// Sample identity
    pub id: Uuid,

    /// Lab code, unique
    pub code: String,

    /// Patient identity
    pub patient_id: Uuid,

    /// Analysis kind stable name
    pub analysis_kind: String,

    /// Sample status name
    pub status: String,

    /// Result status name
    pub result_status: String,

    /// Reception time
    pub received_at: DateTime<Utc>,

    /// Aggregate version stored with this row
    pub version: i64,

    /// Serialized snapshot
    pub document: Value,
}

impl PostgreSQLSample {
    /// Convert from the domain aggregate
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or the version
    /// does not fit a `BIGINT`.
    pub fn from_domain(sample: &Sample) -> Result<Self> {
        let snapshot = sample.snapshot();
        let version = i64::try_from(snapshot.version).map_err(|_| {
            LabError::Database(format!("Version {} exceeds BIGINT", snapshot.version))
        })?;

        Ok(Self {
            id: snapshot.id.into_inner(),
            code: snapshot.code.to_string(),
            patient_id: snapshot.patient_id.into_inner(),
            analysis_kind: snapshot.analysis_kind.as_str().to_string(),
            status: snapshot.status.as_str().to_string(),
            result_status: snapshot.result_status.as_str().to_string(),
            received_at: snapshot.received_at,
            version,
            document: serde_json::to_value(&snapshot)?,
        })
    }

    /// Read a row selected with [`SAMPLE_COLUMNS`]
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or has an unexpected type.
    pub fn from_row(row: &Row) -> Result<Self> {
        let column_error =
            |e: tokio_postgres::Error| LabError::Database(format!("Failed to read sample row: {e}"));

        Ok(Self {
            id: row.try_get("id").map_err(column_error)?,
            code: row.try_get("code").map_err(column_error)?,
            patient_id: row.try_get("patient_id").map_err(column_error)?,
            analysis_kind: row.try_get("analysis_kind").map_err(column_error)?,
            status: row.try_get("status").map_err(column_error)?,
            result_status: row.try_get("result_status").map_err(column_error)?,
            received_at: row.try_get("received_at").map_err(column_error)?,
            version: row.try_get("version").map_err(column_error)?,
            document: row.try_get("document").map_err(column_error)?,
        })
    }

    /// Convert to the domain aggregate
    ///
    /// The `version` column wins over the version inside the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not deserialize or breaks an
    /// aggregate invariant.
    pub fn into_domain(self) -> Result<Sample> {
        let mut snapshot: SampleSnapshot = serde_json::from_value(self.document)?;
        snapshot.version = u64::try_from(self.version).map_err(|_| {
            LabError::Database(format!("Negative version {} for sample {}", self.version, self.code))
        })?;
        Sample::restore(snapshot)
    }
}
