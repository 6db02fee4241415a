//! Outward representation of a sample
//!
//! [`SampleDto`] is the stable contract for transport layers and the cache.
//! Aggregate internals beyond these fields are not exposed.

use crate::domain::analysis::AnalysisResult;
use crate::domain::ids::{PatientId, SampleId};
use crate::domain::sample::Sample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result block of a [`SampleDto`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDto {
    pub value: f64,
    pub unit: String,
    pub reference_min: f64,
    pub reference_max: f64,
    /// `Low`, `Normal` or `High`
    pub status: String,
    pub is_normal: bool,
    pub notes: String,
    pub completed_at: DateTime<Utc>,
}

impl From<&AnalysisResult> for ResultDto {
    fn from(result: &AnalysisResult) -> Self {
        let value = result.value();
        Self {
            value: value.value(),
            unit: value.unit().to_string(),
            reference_min: value.reference_min(),
            reference_max: value.reference_max(),
            status: value.status().as_str().to_string(),
            is_normal: value.is_normal(),
            notes: result.notes().to_string(),
            completed_at: result.completed_at(),
        }
    }
}

/// Sample as seen by consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleDto {
    pub id: SampleId,
    pub code: String,
    pub patient_id: PatientId,
    pub analysis_kind: String,
    pub status: String,
    pub result_status: String,
    pub result: Option<ResultDto>,
    pub received_at: DateTime<Utc>,
}

impl From<&Sample> for SampleDto {
    fn from(sample: &Sample) -> Self {
        Self {
            id: sample.id(),
            code: sample.code().to_string(),
            patient_id: sample.patient_id(),
            analysis_kind: sample.analysis_kind().as_str().to_string(),
            status: sample.status().as_str().to_string(),
            result_status: sample.result_status().as_str().to_string(),
            result: sample.result().map(ResultDto::from),
            received_at: sample.received_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::AnalysisKind;
    use crate::domain::clock::SystemClock;
    use crate::domain::result_value::ResultValue;
    use uuid::Uuid;

    #[test]
    fn test_dto_maps_names_and_result() {
        let mut rng = rand::thread_rng();
        let mut sample =
            Sample::create(Uuid::new_v4(), AnalysisKind::HepatitisB, &SystemClock, &mut rng)
                .unwrap();

        let dto = SampleDto::from(&sample);
        assert_eq!(dto.analysis_kind, "HepatitisB");
        assert_eq!(dto.status, "Received");
        assert_eq!(dto.result_status, "Pending");
        assert!(dto.result.is_none());

        sample.add_result(
            ResultValue::new(0.2, "IU/mL", 0.0, 10.0).unwrap(),
            "negative",
            &SystemClock,
            &mut rng,
        );
        let dto = SampleDto::from(&sample);
        let result = dto.result.as_ref().unwrap();
        assert_eq!(result.status, "Normal");
        assert!(result.is_normal);
        assert_eq!(result.notes, "negative");

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["result_status"], "Completed");
        assert_eq!(json["result"]["reference_max"], 10.0);
        let back: SampleDto = serde_json::from_value(json).unwrap();
        assert_eq!(back, dto);
    }
}
