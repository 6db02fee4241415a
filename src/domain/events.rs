//! Domain events recorded by the sample aggregate
//!
//! Each event carries enough data for notification and reporting
//! collaborators to act without loading the sample again.

use super::analysis::AnalysisKind;
use super::email::EmailAddress;
use super::ids::{DoctorId, PatientId, SampleId};
use super::result_value::RangeStatus;
use super::sample_code::SampleCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A lifecycle transition of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SampleEvent {
    /// A sample was received by the lab
    SampleReceived {
        sample_id: SampleId,
        code: SampleCode,
        patient_id: PatientId,
        analysis_kind: AnalysisKind,
        occurred_at: DateTime<Utc>,
    },

    /// A result was recorded for a sample
    ResultCompleted {
        sample_id: SampleId,
        code: SampleCode,
        analysis_kind: AnalysisKind,
        value: f64,
        unit: String,
        range_status: RangeStatus,
        occurred_at: DateTime<Utc>,
    },

    /// A doctor validated the result
    ResultValidated {
        sample_id: SampleId,
        code: SampleCode,
        patient_id: PatientId,
        analysis_kind: AnalysisKind,
        validated_by: DoctorId,
        is_normal: bool,
        occurred_at: DateTime<Utc>,
    },

    /// The patient was told the result is ready
    PatientNotified {
        sample_id: SampleId,
        code: SampleCode,
        patient_email: EmailAddress,
        occurred_at: DateTime<Utc>,
    },
}

impl SampleEvent {
    /// Short event name, suitable for log fields
    pub fn name(&self) -> &'static str {
        match self {
            SampleEvent::SampleReceived { .. } => "SampleReceived",
            SampleEvent::ResultCompleted { .. } => "ResultCompleted",
            SampleEvent::ResultValidated { .. } => "ResultValidated",
            SampleEvent::PatientNotified { .. } => "PatientNotified",
        }
    }

    /// Sample the event belongs to
    pub fn sample_id(&self) -> SampleId {
        match self {
            SampleEvent::SampleReceived { sample_id, .. }
            | SampleEvent::ResultCompleted { sample_id, .. }
            | SampleEvent::ResultValidated { sample_id, .. }
            | SampleEvent::PatientNotified { sample_id, .. } => *sample_id,
        }
    }

    /// Code of the sample the event belongs to
    pub fn code(&self) -> &SampleCode {
        match self {
            SampleEvent::SampleReceived { code, .. }
            | SampleEvent::ResultCompleted { code, .. }
            | SampleEvent::ResultValidated { code, .. }
            | SampleEvent::PatientNotified { code, .. } => code,
        }
    }

    /// When the transition happened
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SampleEvent::SampleReceived { occurred_at, .. }
            | SampleEvent::ResultCompleted { occurred_at, .. }
            | SampleEvent::ResultValidated { occurred_at, .. }
            | SampleEvent::PatientNotified { occurred_at, .. } => *occurred_at,
        }
    }
}
