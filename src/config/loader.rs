//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, LabConfig, NotificationProvider};
use super::secret::secret_string;
use crate::domain::errors::LabError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is a valid regex")
    })
}

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LabConfig
/// 4. Applies environment variable overrides (LABTRACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `LabError::Configuration` if the file cannot be read or parsed,
/// a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use labtrack::config::loader::load_config;
///
/// let config = load_config("labtrack.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LabConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LabError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LabError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] without the file access.
///
/// # Errors
///
/// Returns `LabError::Configuration` on substitution, parse or validation failure.
pub fn load_config_from_str(contents: &str) -> Result<LabConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: LabConfig = toml::from_str(&contents)
        .map_err(|e| LabError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        LabError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(LabError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        LabError::Configuration(format!("Invalid value '{value}' for environment variable {name}"))
    })
}

/// Applies environment variable overrides using LABTRACK_* prefix
///
/// Environment variables follow the pattern: LABTRACK_<SECTION>_<KEY>
/// For example: LABTRACK_NOTIFICATION_ENDPOINT, LABTRACK_CACHE_TTL_SECONDS
fn apply_env_overrides(config: &mut LabConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("LABTRACK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = var("LABTRACK_DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "memory" => DatabaseTarget::Memory,
            "postgresql" => DatabaseTarget::PostgreSQL,
            other => {
                return Err(LabError::Configuration(format!(
                    "Invalid LABTRACK_DATABASE_TARGET '{other}'. Must be one of: memory, postgresql"
                )))
            }
        };
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Some(val) = var("LABTRACK_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Some(val) = var("LABTRACK_POSTGRESQL_MAX_CONNECTIONS") {
            pg_config.max_connections =
                parse_override("LABTRACK_POSTGRESQL_MAX_CONNECTIONS", &val)?;
        }
    }

    // Notification overrides
    if let Some(val) = var("LABTRACK_NOTIFICATION_PROVIDER") {
        config.notification.provider = match val.to_lowercase().as_str() {
            "log" => NotificationProvider::Log,
            "webhook" => NotificationProvider::Webhook,
            other => {
                return Err(LabError::Configuration(format!(
                    "Invalid LABTRACK_NOTIFICATION_PROVIDER '{other}'. Must be one of: log, webhook"
                )))
            }
        };
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_ENDPOINT") {
        config.notification.endpoint = Some(val);
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_AUTH_TYPE") {
        config.notification.auth_type = val;
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_API_KEY") {
        config.notification.api_key = Some(secret_string(val));
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_USERNAME") {
        config.notification.username = Some(val);
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_PASSWORD") {
        config.notification.password = Some(secret_string(val));
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_TIMEOUT_SECONDS") {
        config.notification.timeout_seconds =
            parse_override("LABTRACK_NOTIFICATION_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = var("LABTRACK_NOTIFICATION_ABNORMAL_ALERT_RECIPIENT") {
        config.notification.abnormal_alert_recipient = Some(val);
    }

    // Cache overrides
    if let Some(val) = var("LABTRACK_CACHE_ENABLED") {
        config.cache.enabled = parse_override("LABTRACK_CACHE_ENABLED", &val)?;
    }
    if let Some(val) = var("LABTRACK_CACHE_TTL_SECONDS") {
        config.cache.ttl_seconds = parse_override("LABTRACK_CACHE_TTL_SECONDS", &val)?;
    }

    // Logging overrides
    if let Some(val) = var("LABTRACK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LABTRACK_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("LABTRACK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LABTRACK_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${LABTRACK_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"");
        std::env::remove_var("LABTRACK_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LABTRACK_LOADER_MISSING_VAR");
        let input = "password = \"${LABTRACK_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LABTRACK_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# key = \"${LABTRACK_LOADER_NEVER_SET}\"\nlevel = \"info\"\n";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(LabError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
environment = "development"
database_target = "memory"

[application]
log_level = "debug"

[notification]
provider = "log"
abnormal_alert_recipient = "oncall@lab.example.org"

[cache]
enabled = true
ttl_seconds = 60
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(
            config.notification.abnormal_alert_recipient.as_deref(),
            Some("oncall@lab.example.org")
        );
    }

    #[test]
    fn test_load_config_invalid_values() {
        let result = load_config_from_str("[application]\nlog_level = \"verbose\"\n");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration validation failed"));
    }
}
