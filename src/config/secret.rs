//! Secure credential handling using the secrecy crate
//!
//! Connection strings, webhook tokens and passwords are held in
//! [`SecretString`]. Memory is zeroed on drop, `Debug` output is redacted, and
//! reading the value requires an explicit `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use labtrack::config::{SecretString, SecretValue};
//! use secrecy::{ExposeSecret, Secret};
//!
//! let api_key: SecretString = Secret::new(SecretValue::from("webhook-token".to_string()));
//! assert_eq!(api_key.expose_secret(), "webhook-token");
//!
//! // Debug output is redacted
//! assert!(!format!("{api_key:?}").contains("webhook-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload of a [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the secret value starts with a prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Parse the secret value into another type
    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }

    /// Connection-string form with the user-info part masked
    ///
    /// `postgresql://lab:pw@db:5432/labtrack` becomes `postgresql://***@db:5432/labtrack`.
    pub fn redacted_url(&self) -> String {
        match self.0.split_once("://") {
            Some((scheme, rest)) => match rest.rsplit_once('@') {
                Some((_, host)) => format!("{scheme}://***@{host}"),
                None => format!("{scheme}://{rest}"),
            },
            None => "***".to_string(),
        }
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string held by configuration sections
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string into a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("webhook-token".to_string());
        assert_eq!(secret.expose_secret(), "webhook-token");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-data"));
    }

    #[test]
    fn test_redacted_url() {
        let secret = secret_string("postgresql://lab:pw@db.local:5432/labtrack".to_string());
        let shown = secret.expose_secret().redacted_url();
        assert_eq!(shown, "postgresql://***@db.local:5432/labtrack");
        assert!(!shown.contains("pw"));

        let no_auth = secret_string("postgres://db.local/labtrack".to_string());
        assert_eq!(
            no_auth.expose_secret().redacted_url(),
            "postgres://db.local/labtrack"
        );
    }

    #[test]
    fn test_secret_serde() {
        #[derive(Serialize, Deserialize)]
        struct TestConfig {
            api_key: SecretString,
        }

        let config = TestConfig {
            api_key: secret_string("test123".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("test123"));

        let deserialized: TestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.api_key.expose_secret(), "test123");
    }
}
