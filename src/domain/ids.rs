//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identities used by the
//! sample lifecycle. Every identifier wraps a UUID and refuses the nil UUID,
//! so an "empty" identity can never be constructed.

use crate::domain::errors::LabError;
use crate::domain::result::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "Uuid", into = "Uuid")]
        pub struct $name(Uuid);

        impl $name {
            /// Creates the identifier, rejecting the nil UUID
            pub fn new(id: Uuid) -> Result<Self> {
                if id.is_nil() {
                    return Err(LabError::InvalidArgument(format!(
                        "{} cannot be empty",
                        $label
                    )));
                }
                Ok(Self(id))
            }

            /// Generates a fresh random identifier from the given source
            pub fn generate(rng: &mut dyn RngCore) -> Self {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                // A v4 UUID always carries version bits, so it is never nil
                Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
            }

            /// Returns the wrapped UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Consumes self and returns the inner UUID
            pub fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = LabError;

            fn from_str(s: &str) -> Result<Self> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(LabError::InvalidArgument(format!(
                        "{} cannot be empty",
                        $label
                    )));
                }
                let id = Uuid::parse_str(trimmed).map_err(|e| {
                    LabError::InvalidArgument(format!("Invalid {} '{}': {}", $label, trimmed, e))
                })?;
                Self::new(id)
            }
        }

        impl TryFrom<Uuid> for $name {
            type Error = LabError;

            fn try_from(id: Uuid) -> Result<Self> {
                Self::new(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

uuid_identifier!(
    /// Identity of the patient a sample was taken from
    ///
    /// # Examples
    ///
    /// ```
    /// use labtrack::domain::ids::PatientId;
    ///
    /// let id: PatientId = "7d44b88c-4199-4bad-97dc-d78268e01398".parse().unwrap();
    /// assert_eq!(id.to_string(), "7d44b88c-4199-4bad-97dc-d78268e01398");
    /// assert!("00000000-0000-0000-0000-000000000000".parse::<PatientId>().is_err());
    /// ```
    PatientId,
    "patient id"
);

uuid_identifier!(
    /// Identity of the doctor who validates a result
    DoctorId,
    "doctor id"
);

uuid_identifier!(
    /// Identity of a sample aggregate
    SampleId,
    "sample id"
);

uuid_identifier!(
    /// Identity of an analysis result owned by a sample
    ResultId,
    "result id"
);
