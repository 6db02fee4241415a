//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIGURATION, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "labtrack.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing LabTrack configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIGURATION);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set database_target to 'memory' or 'postgresql'");
                println!("  3. Put credentials in a .env file:");
                println!("     - LABTRACK_PG_URL (if using PostgreSQL)");
                println!("     - LABTRACK_WEBHOOK_TOKEN (if using the webhook provider)");
                println!("  4. Validate configuration: labtrack validate-config");
                println!("  5. Try the lifecycle: labtrack demo");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# LabTrack Configuration File

environment = "development"  # development | staging | production
database_target = "memory"   # memory | postgresql

[application]
log_level = "info"

# [postgresql]
# connection_string = "${LABTRACK_PG_URL}"

[notification]
provider = "log"  # log | webhook
# abnormal_alert_recipient = "oncall@lab.example.org"

[cache]
enabled = true
ttl_seconds = 300

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# LabTrack Configuration File
#
# Values of the form ${VAR} are replaced with environment variables, and any
# key can be overridden with LABTRACK_<SECTION>_<KEY>, for example
# LABTRACK_CACHE_TTL_SECONDS=60.

# ============================================================================
# Environment and Storage
# ============================================================================
# development | staging | production
# Production requires PostgreSQL and an https webhook endpoint.
environment = "development"

# memory | postgresql
# The memory backend keeps samples for the lifetime of one process only.
database_target = "memory"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# PostgreSQL
# ============================================================================
# Required when database_target = "postgresql"
#
# [postgresql]
# # postgresql://[user[:password]@][host][:port][/dbname][?params]
# connection_string = "${LABTRACK_PG_URL}"
#
# max_connections = 10                # Pool size (1-100)
# connection_timeout_seconds = 30     # Timeout for acquiring a connection
# statement_timeout_seconds = 30      # Timeout for one SQL statement
# auto_migrate = true                 # Create the samples table on startup

# ============================================================================
# Notifications
# ============================================================================
[notification]
# log     - write messages to the log only
# webhook - POST a JSON payload to `endpoint`
provider = "log"

# endpoint = "https://notify.example.org/lab"
# auth_type = "bearer"                # none | bearer | basic
# api_key = "${LABTRACK_WEBHOOK_TOKEN}"
# username = "labtrack"               # basic auth
# password = "${LABTRACK_WEBHOOK_PASSWORD}"
# timeout_seconds = 10

# Receives an alert whenever an abnormal result is validated
# abnormal_alert_recipient = "oncall@lab.example.org"

# ============================================================================
# Cache
# ============================================================================
[cache]
# Cache single-sample lookups by id and code
enabled = true

# Entry lifetime in seconds
ttl_seconds = 300

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to local files
local_enabled = false

# Directory of the log files
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
