//! Domain models and types for LabTrack.
//!
//! This module contains the sample lifecycle model: value objects, the
//! [`Sample`] aggregate with its state machine, and the events it records.
//! Nothing in here performs I/O; time and randomness are passed in through
//! [`Clock`] and [`rand::RngCore`].
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`DoctorId`], [`SampleId`], [`ResultId`])
//! - **Value objects** ([`SampleCode`], [`ResultValue`], [`EmailAddress`])
//! - **The aggregate** ([`Sample`], [`AnalysisResult`], [`SampleSnapshot`])
//! - **Domain events** ([`SampleEvent`])
//! - **Error types** ([`LabError`], [`ErrorCategory`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Identifiers are newtypes, so a doctor id can never be passed where a
//! patient id is expected:
//!
//! ```rust
//! use labtrack::domain::{DoctorId, PatientId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient: PatientId = "7d44b88c-4199-4bad-97dc-d78268e01398".parse()?;
//! let doctor: DoctorId = "0b7e5c0e-6f57-4a38-9f0d-2f3c9f0fa001".parse()?;
//!
//! // This won't compile - the types differ
//! // let wrong: PatientId = doctor;
//! # let _ = (patient, doctor);
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! ```rust
//! use labtrack::domain::{AnalysisKind, DoctorId, ResultValue, Sample, SystemClock};
//! use uuid::Uuid;
//!
//! # fn example() -> labtrack::domain::Result<()> {
//! let clock = SystemClock;
//! let mut rng = rand::thread_rng();
//!
//! let mut sample = Sample::create(Uuid::new_v4(), AnalysisKind::Glucose, &clock, &mut rng)?;
//! sample.add_result(ResultValue::new(5.4, "mmol/L", 3.9, 6.1)?, "fasting", &clock, &mut rng);
//! sample.validate(DoctorId::new(Uuid::new_v4())?, "", &clock)?;
//! assert_eq!(sample.pending_events().len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod clock;
pub mod email;
pub mod errors;
pub mod events;
pub mod ids;
pub mod result;
pub mod result_value;
pub mod sample;
pub mod sample_code;

// Re-export commonly used types for convenience
pub use analysis::{AnalysisKind, AnalysisResult};
pub use clock::{Clock, FixedClock, SystemClock};
pub use email::EmailAddress;
pub use errors::{ErrorCategory, LabError};
pub use events::SampleEvent;
pub use ids::{DoctorId, PatientId, ResultId, SampleId};
pub use result::Result;
pub use result_value::{RangeStatus, ResultValue};
pub use sample::{ResultStatus, Sample, SampleSnapshot, SampleStatus, ValidationRecord};
pub use sample_code::SampleCode;
