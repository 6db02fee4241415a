//! Sample aggregate
//!
//! The sample is the unit of consistency for the lab workflow. All lifecycle
//! rules live here: callers can only change a sample through [`Sample::add_result`],
//! [`Sample::validate`], [`Sample::mark_notified`] and [`Sample::reject`].
//!
//! # Lifecycle
//!
//! ```text
//! status:         Received ──► Completed ──► Validated
//!                     └──────────┴──────────────┴──► Rejected
//! result_status:  Pending ──► Completed ──► Validated ──► Notified
//! ```
//!
//! Every successful operation bumps [`Sample::version`]. Operations other than
//! `reject` also return the [`SampleEvent`] they produced and keep a copy in
//! the pending list until [`Sample::take_events`] is called after a successful
//! save.

use super::analysis::{AnalysisKind, AnalysisResult};
use super::clock::Clock;
use super::email::EmailAddress;
use super::events::SampleEvent;
use super::ids::{DoctorId, PatientId, ResultId, SampleId};
use super::result_value::ResultValue;
use super::sample_code::SampleCode;
use crate::domain::errors::LabError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleStatus {
    /// Logged at intake
    Received,
    /// Reserved for in-lab processing; no operation enters it yet
    Processing,
    /// A result has been recorded
    Completed,
    /// A doctor validated the result
    Validated,
    /// The sample was rejected
    Rejected,
}

impl SampleStatus {
    /// Stable name used in representations and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleStatus::Received => "Received",
            SampleStatus::Processing => "Processing",
            SampleStatus::Completed => "Completed",
            SampleStatus::Validated => "Validated",
            SampleStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the sample's result through review and notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    /// No result yet
    Pending,
    /// Result recorded, awaiting validation
    Completed,
    /// Result validated by a doctor
    Validated,
    /// Patient has been notified
    Notified,
}

impl ResultStatus {
    /// Stable name used in representations and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Pending => "Pending",
            ResultStatus::Completed => "Completed",
            ResultStatus::Validated => "Validated",
            ResultStatus::Notified => "Notified",
        }
    }

    /// Whether a doctor has signed off the result
    pub fn is_validated(&self) -> bool {
        matches!(self, ResultStatus::Validated | ResultStatus::Notified)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who validated the result, when, and with which remarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub doctor_id: DoctorId,
    pub notes: String,
    pub validated_at: DateTime<Utc>,
}

/// Serializable persistence form of a [`Sample`]
///
/// Storage adapters write and read this type; [`Sample::restore`] checks the
/// aggregate invariants before handing a sample back to the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSnapshot {
    pub id: SampleId,
    pub code: SampleCode,
    pub patient_id: PatientId,
    pub analysis_kind: AnalysisKind,
    pub status: SampleStatus,
    pub result_status: ResultStatus,
    pub result: Option<AnalysisResult>,
    pub validation: Option<ValidationRecord>,
    pub notified_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub received_at: DateTime<Utc>,
    pub version: u64,
}

/// A laboratory test sample
#[derive(Debug, Clone)]
pub struct Sample {
    id: SampleId,
    code: SampleCode,
    patient_id: PatientId,
    analysis_kind: AnalysisKind,
    status: SampleStatus,
    result_status: ResultStatus,
    result: Option<AnalysisResult>,
    validation: Option<ValidationRecord>,
    notified_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    received_at: DateTime<Utc>,
    version: u64,
    persisted_version: u64,
    pending_events: Vec<SampleEvent>,
}

impl Sample {
    /// Registers a newly received sample
    ///
    /// Generates the sample identity and code from `rng` and stamps the
    /// reception time from `clock`. Queues a `SampleReceived` event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `patient_id` is the nil UUID.
    ///
    /// # Examples
    ///
    /// ```
    /// use labtrack::domain::analysis::AnalysisKind;
    /// use labtrack::domain::clock::SystemClock;
    /// use labtrack::domain::sample::{ResultStatus, Sample, SampleStatus};
    /// use uuid::Uuid;
    ///
    /// let mut rng = rand::thread_rng();
    /// let sample = Sample::create(Uuid::new_v4(), AnalysisKind::Glucose, &SystemClock, &mut rng).unwrap();
    /// assert_eq!(sample.status(), SampleStatus::Received);
    /// assert_eq!(sample.result_status(), ResultStatus::Pending);
    /// assert_eq!(sample.pending_events().len(), 1);
    /// ```
    pub fn create(
        patient_id: Uuid,
        analysis_kind: AnalysisKind,
        clock: &dyn Clock,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        let patient_id = PatientId::new(patient_id)?;
        let received_at = clock.now();
        let id = SampleId::generate(rng);
        let code = SampleCode::generate(received_at, rng);

        let mut sample = Self {
            id,
            code: code.clone(),
            patient_id,
            analysis_kind,
            status: SampleStatus::Received,
            result_status: ResultStatus::Pending,
            result: None,
            validation: None,
            notified_at: None,
            rejection_reason: None,
            received_at,
            version: 0,
            persisted_version: 0,
            pending_events: Vec::new(),
        };

        sample.record(SampleEvent::SampleReceived {
            sample_id: id,
            code,
            patient_id,
            analysis_kind,
            occurred_at: received_at,
        });

        Ok(sample)
    }

    /// Rebuilds a sample from its persisted form
    ///
    /// The restored sample has no pending events and its persisted version
    /// equals the snapshot version.
    ///
    /// # Errors
    ///
    /// Returns `Database` when the snapshot breaks an aggregate invariant.
    /// Snapshots only come from storage, so a broken one is a storage fault.
    pub fn restore(snapshot: SampleSnapshot) -> Result<Self> {
        let corrupt = |reason: &str| {
            Err(LabError::Database(format!(
                "Corrupt sample snapshot {}: {}",
                snapshot.code, reason
            )))
        };

        if snapshot.version == 0 {
            return corrupt("version must be at least 1");
        }
        if snapshot.result_status.is_validated() != snapshot.validation.is_some() {
            return corrupt("validation record does not match result status");
        }
        if (snapshot.result_status == ResultStatus::Notified) != snapshot.notified_at.is_some() {
            return corrupt("notification time does not match result status");
        }
        if (snapshot.result_status == ResultStatus::Pending) == snapshot.result.is_some() {
            return corrupt("analysis result does not match result status");
        }
        if let Some(result) = &snapshot.result {
            if result.kind() != snapshot.analysis_kind {
                return corrupt("analysis result kind differs from sample kind");
            }
        }
        let consistent = match snapshot.status {
            SampleStatus::Received | SampleStatus::Processing => {
                snapshot.result_status == ResultStatus::Pending
            }
            SampleStatus::Completed => snapshot.result_status == ResultStatus::Completed,
            SampleStatus::Validated => snapshot.result_status.is_validated(),
            SampleStatus::Rejected => true,
        };
        if !consistent {
            return corrupt("status and result status are inconsistent");
        }

        Ok(Self {
            id: snapshot.id,
            code: snapshot.code,
            patient_id: snapshot.patient_id,
            analysis_kind: snapshot.analysis_kind,
            status: snapshot.status,
            result_status: snapshot.result_status,
            result: snapshot.result,
            validation: snapshot.validation,
            notified_at: snapshot.notified_at,
            rejection_reason: snapshot.rejection_reason,
            received_at: snapshot.received_at,
            version: snapshot.version,
            persisted_version: snapshot.version,
            pending_events: Vec::new(),
        })
    }

    /// Captures the full current state for storage
    pub fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot {
            id: self.id,
            code: self.code.clone(),
            patient_id: self.patient_id,
            analysis_kind: self.analysis_kind,
            status: self.status,
            result_status: self.result_status,
            result: self.result.clone(),
            validation: self.validation.clone(),
            notified_at: self.notified_at,
            rejection_reason: self.rejection_reason.clone(),
            received_at: self.received_at,
            version: self.version,
        }
    }

    /// Records the analysis result
    ///
    /// Accepted in every state. Adding a result to a validated or notified
    /// sample replaces the result, reverts the result status to `Completed`
    /// and clears the validation and notification record.
    pub fn add_result(
        &mut self,
        value: ResultValue,
        notes: impl Into<String>,
        clock: &dyn Clock,
        rng: &mut dyn RngCore,
    ) -> SampleEvent {
        let completed_at = clock.now();
        let result = AnalysisResult::new(
            ResultId::generate(rng),
            self.analysis_kind,
            value,
            notes.into(),
            completed_at,
        );

        let event = SampleEvent::ResultCompleted {
            sample_id: self.id,
            code: self.code.clone(),
            analysis_kind: self.analysis_kind,
            value: result.value().value(),
            unit: result.value().unit().to_string(),
            range_status: result.value().status(),
            occurred_at: completed_at,
        };

        self.result = Some(result);
        self.validation = None;
        self.notified_at = None;
        self.status = SampleStatus::Completed;
        self.result_status = ResultStatus::Completed;

        self.record(event)
    }

    /// Validates the recorded result
    ///
    /// # Errors
    ///
    /// - `AlreadyValidated` when the result was validated before
    /// - `NotReady` when no result is awaiting validation
    pub fn validate(
        &mut self,
        doctor_id: DoctorId,
        notes: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<SampleEvent> {
        if self.result_status.is_validated() {
            return Err(LabError::AlreadyValidated(self.code.to_string()));
        }
        if self.result_status != ResultStatus::Completed {
            return Err(LabError::not_ready(
                self.code.as_str(),
                format!(
                    "result status is {}, expected {}",
                    self.result_status,
                    ResultStatus::Completed
                ),
            ));
        }
        let is_normal = match &self.result {
            Some(result) => result.value().is_normal(),
            None => {
                return Err(LabError::not_ready(
                    self.code.as_str(),
                    "no analysis result recorded",
                ))
            }
        };

        let validated_at = clock.now();
        self.validation = Some(ValidationRecord {
            doctor_id,
            notes: notes.into(),
            validated_at,
        });
        self.status = SampleStatus::Validated;
        self.result_status = ResultStatus::Validated;

        Ok(self.record(SampleEvent::ResultValidated {
            sample_id: self.id,
            code: self.code.clone(),
            patient_id: self.patient_id,
            analysis_kind: self.analysis_kind,
            validated_by: doctor_id,
            is_normal,
            occurred_at: validated_at,
        }))
    }

    /// Marks the patient as notified
    ///
    /// # Errors
    ///
    /// Returns `NotReady` unless the result status is `Validated`.
    pub fn mark_notified(
        &mut self,
        patient_email: EmailAddress,
        clock: &dyn Clock,
    ) -> Result<SampleEvent> {
        self.ensure_notifiable()?;

        let notified_at = clock.now();
        self.notified_at = Some(notified_at);
        self.result_status = ResultStatus::Notified;

        Ok(self.record(SampleEvent::PatientNotified {
            sample_id: self.id,
            code: self.code.clone(),
            patient_email,
            occurred_at: notified_at,
        }))
    }

    /// Checks the `mark_notified` precondition without changing state
    ///
    /// # Errors
    ///
    /// Returns `NotReady` unless the result status is `Validated`.
    pub fn ensure_notifiable(&self) -> Result<()> {
        if self.result_status != ResultStatus::Validated {
            return Err(LabError::not_ready(
                self.code.as_str(),
                format!(
                    "result status is {}, expected {}",
                    self.result_status,
                    ResultStatus::Validated
                ),
            ));
        }
        Ok(())
    }

    /// Rejects the sample
    ///
    /// Allowed from any state. The attached result, if any, is kept. No event
    /// is produced.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.status = SampleStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self.version += 1;
    }

    /// Events produced since the last successful save
    pub fn pending_events(&self) -> &[SampleEvent] {
        &self.pending_events
    }

    /// Drains the pending events and marks the current state as persisted
    ///
    /// Call only after the repository accepted the sample.
    pub fn take_events(&mut self) -> Vec<SampleEvent> {
        self.persisted_version = self.version;
        std::mem::take(&mut self.pending_events)
    }

    /// Whether the sample changed since it was loaded or last saved
    pub fn has_unsaved_changes(&self) -> bool {
        self.version != self.persisted_version
    }

    fn record(&mut self, event: SampleEvent) -> SampleEvent {
        self.version += 1;
        self.pending_events.push(event.clone());
        event
    }

    pub fn id(&self) -> SampleId {
        self.id
    }

    pub fn code(&self) -> &SampleCode {
        &self.code
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn analysis_kind(&self) -> AnalysisKind {
        self.analysis_kind
    }

    pub fn status(&self) -> SampleStatus {
        self.status
    }

    pub fn result_status(&self) -> ResultStatus {
        self.result_status
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn validation(&self) -> Option<&ValidationRecord> {
        self.validation.as_ref()
    }

    pub fn validated_by(&self) -> Option<DoctorId> {
        self.validation.as_ref().map(|v| v.doctor_id)
    }

    pub fn notified_at(&self) -> Option<DateTime<Utc>> {
        self.notified_at
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Version including unsaved operations
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version the storage layer last accepted (0 for a new sample)
    pub fn persisted_version(&self) -> u64 {
        self.persisted_version
    }
}
