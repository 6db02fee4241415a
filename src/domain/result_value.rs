//! Measured result values and reference-range classification

use crate::domain::errors::LabError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a measured value against its reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeStatus {
    /// Below the lower bound
    Low,
    /// Within the reference range (bounds inclusive)
    Normal,
    /// Above the upper bound
    High,
}

impl RangeStatus {
    /// Stable name used in representations
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeStatus::Low => "Low",
            RangeStatus::Normal => "Normal",
            RangeStatus::High => "High",
        }
    }
}

impl fmt::Display for RangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A measured value with its unit and reference range
///
/// `is_normal` and `status` are derived on every call from the three stored
/// numbers; nothing else influences them.
///
/// # Examples
///
/// ```
/// use labtrack::domain::result_value::{RangeStatus, ResultValue};
///
/// let glucose = ResultValue::new(7.0, "mmol/L", 3.9, 6.1).unwrap();
/// assert!(!glucose.is_normal());
/// assert_eq!(glucose.status(), RangeStatus::High);
///
/// assert!(ResultValue::new(5.0, "mmol/L", 6.1, 3.9).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResultValue")]
pub struct ResultValue {
    value: f64,
    unit: String,
    reference_min: f64,
    reference_max: f64,
}

#[derive(Deserialize)]
struct RawResultValue {
    value: f64,
    unit: String,
    reference_min: f64,
    reference_max: f64,
}

impl TryFrom<RawResultValue> for ResultValue {
    type Error = LabError;

    fn try_from(raw: RawResultValue) -> Result<Self> {
        ResultValue::new(raw.value, raw.unit, raw.reference_min, raw.reference_max)
    }
}

impl ResultValue {
    /// Creates a result value
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `reference_min >= reference_max`, if any
    /// number is not finite, or if the unit is blank.
    pub fn new(
        value: f64,
        unit: impl Into<String>,
        reference_min: f64,
        reference_max: f64,
    ) -> Result<Self> {
        if !value.is_finite() || !reference_min.is_finite() || !reference_max.is_finite() {
            return Err(LabError::InvalidArgument(
                "Result value and reference range must be finite numbers".to_string(),
            ));
        }

        if reference_min >= reference_max {
            return Err(LabError::InvalidArgument(format!(
                "Reference range minimum ({reference_min}) must be lower than maximum ({reference_max})"
            )));
        }

        let unit = unit.into().trim().to_string();
        if unit.is_empty() {
            return Err(LabError::InvalidArgument(
                "Result unit cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            value,
            unit,
            reference_min,
            reference_max,
        })
    }

    /// The measured value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Unit of measure
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Lower bound of the reference range
    pub fn reference_min(&self) -> f64 {
        self.reference_min
    }

    /// Upper bound of the reference range
    pub fn reference_max(&self) -> f64 {
        self.reference_max
    }

    /// True when the value lies within the inclusive reference range
    pub fn is_normal(&self) -> bool {
        self.status() == RangeStatus::Normal
    }

    /// Classifies the value against the reference range
    pub fn status(&self) -> RangeStatus {
        if self.value < self.reference_min {
            RangeStatus::Low
        } else if self.value > self.reference_max {
            RangeStatus::High
        } else {
            RangeStatus::Normal
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (ref {}-{})",
            self.value, self.unit, self.reference_min, self.reference_max
        )
    }
}
