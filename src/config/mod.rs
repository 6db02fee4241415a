//! Configuration management for LabTrack.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! LabTrack uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LABTRACK_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation of every section on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use labtrack::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("labtrack.toml")?;
//!
//! println!("Storage: {:?}", config.database_target);
//! println!("Cache TTL: {}s", config.cache.ttl_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`DatabaseTarget`] / [`PostgreSQLConfig`] - Sample storage
//! - [`NotificationConfig`] - Patient notifications and abnormal-result alerts
//! - [`CacheConfig`] - Read cache for single-sample lookups
//! - [`LoggingConfig`] - Local JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "staging"
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [postgresql]
//! connection_string = "${LABTRACK_PG_URL}"
//!
//! [notification]
//! provider = "webhook"
//! endpoint = "https://notify.example.org/lab"
//! auth_type = "bearer"
//! api_key = "${LABTRACK_WEBHOOK_TOKEN}"
//! abnormal_alert_recipient = "oncall@lab.example.org"
//!
//! [cache]
//! ttl_seconds = 120
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, CacheConfig, DatabaseTarget, Environment, LabConfig, LoggingConfig,
    NotificationConfig, NotificationProvider, PostgreSQLConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
