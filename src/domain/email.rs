//! Recipient e-mail addresses

use crate::domain::errors::LabError;
use crate::domain::result::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

/// E-mail address of a notification recipient, stored lower-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates an address after a structural check
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for blank or malformed addresses.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(LabError::InvalidArgument(
                "E-mail address cannot be empty".to_string(),
            ));
        }
        if !email_pattern().is_match(trimmed) {
            return Err(LabError::InvalidArgument(format!(
                "Invalid e-mail address: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = LabError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<EmailAddress> for String {
    fn from(address: EmailAddress) -> String {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address_normalized() {
        let email = EmailAddress::new("  Ana.Lopez@Example.ORG ").unwrap();
        assert_eq!(email.as_str(), "ana.lopez@example.org");
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in ["", "   ", "no-at-sign", "a@b", "two@@example.com", "sp ace@x.io"] {
            assert!(EmailAddress::new(bad).is_err(), "{bad} should be rejected");
        }
    }
}
