//! Analysis kinds and the result record attached to a sample

use super::ids::ResultId;
use super::result_value::ResultValue;
use crate::domain::errors::LabError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of analysis requested for a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    /// Complete blood count
    BloodCount,
    /// Blood glucose
    Glucose,
    /// Lipid panel
    Cholesterol,
    /// Thyroid function (TSH/T4)
    Thyroid,
    /// Urinalysis
    Urine,
    /// HIV screening
    Hiv,
    /// Hepatitis B panel
    HepatitisB,
    /// Hepatitis C panel
    HepatitisC,
    /// SARS-CoV-2 test
    Covid19,
}

impl AnalysisKind {
    /// Every supported kind, in catalogue order
    pub const ALL: [AnalysisKind; 9] = [
        AnalysisKind::BloodCount,
        AnalysisKind::Glucose,
        AnalysisKind::Cholesterol,
        AnalysisKind::Thyroid,
        AnalysisKind::Urine,
        AnalysisKind::Hiv,
        AnalysisKind::HepatitisB,
        AnalysisKind::HepatitisC,
        AnalysisKind::Covid19,
    ];

    /// Stable name used in representations and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::BloodCount => "BloodCount",
            AnalysisKind::Glucose => "Glucose",
            AnalysisKind::Cholesterol => "Cholesterol",
            AnalysisKind::Thyroid => "Thyroid",
            AnalysisKind::Urine => "Urine",
            AnalysisKind::Hiv => "Hiv",
            AnalysisKind::HepatitisB => "HepatitisB",
            AnalysisKind::HepatitisC => "HepatitisC",
            AnalysisKind::Covid19 => "Covid19",
        }
    }

    /// Human-readable label for reports and alerts
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::BloodCount => "Complete blood count",
            AnalysisKind::Glucose => "Blood glucose",
            AnalysisKind::Cholesterol => "Cholesterol panel",
            AnalysisKind::Thyroid => "Thyroid function",
            AnalysisKind::Urine => "Urinalysis",
            AnalysisKind::Hiv => "HIV screening",
            AnalysisKind::HepatitisB => "Hepatitis B panel",
            AnalysisKind::HepatitisC => "Hepatitis C panel",
            AnalysisKind::Covid19 => "COVID-19 test",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        AnalysisKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = AnalysisKind::ALL.iter().map(|k| k.as_str()).collect();
                LabError::InvalidArgument(format!(
                    "Unknown analysis kind '{}'. Must be one of: {}",
                    wanted,
                    names.join(", ")
                ))
            })
    }
}

/// Result of an analysis, owned by exactly one sample
///
/// The completion timestamp is fixed when the record is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    id: ResultId,
    kind: AnalysisKind,
    value: ResultValue,
    notes: String,
    completed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub(crate) fn new(
        id: ResultId,
        kind: AnalysisKind,
        value: ResultValue,
        notes: String,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            value,
            notes,
            completed_at,
        }
    }

    /// Identity of this result
    pub fn id(&self) -> ResultId {
        self.id
    }

    /// Analysis kind the result belongs to
    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    /// The measured value and its reference range
    pub fn value(&self) -> &ResultValue {
        &self.value
    }

    /// Free-text notes from the technician
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// When the result was recorded
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
