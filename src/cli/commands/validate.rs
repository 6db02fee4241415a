//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the LabTrack configuration file.

use super::{EXIT_CONFIGURATION, EXIT_OK};
use crate::config::load_config;
use crate::config::schema::{DatabaseTarget, NotificationProvider};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateConfigArgs {}

impl ValidateConfigArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also runs validation
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIGURATION);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);

        match config.database_target {
            DatabaseTarget::Memory => println!("  Database Target: in-memory"),
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    println!("  Database Target: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        pg_config.connection_string.expose_secret().redacted_url()
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
        }

        match config.notification.provider {
            NotificationProvider::Log => println!("  Notifications: log"),
            NotificationProvider::Webhook => println!(
                "  Notifications: webhook ({})",
                config.notification.endpoint.as_deref().unwrap_or("-")
            ),
        }
        println!(
            "  Abnormal Alerts: {}",
            config
                .notification
                .abnormal_alert_recipient
                .as_deref()
                .unwrap_or("disabled")
        );

        if config.cache.enabled {
            println!("  Cache TTL: {}s", config.cache.ttl_seconds);
        } else {
            println!("  Cache: disabled");
        }
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_config_reports_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[cache]\nttl_seconds = 0\n").unwrap();

        let code = ValidateConfigArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIGURATION);
    }

    #[tokio::test]
    async fn test_validate_config_missing_file() {
        let code = ValidateConfigArgs {}
            .execute("/nonexistent/labtrack.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIGURATION);
    }
}
