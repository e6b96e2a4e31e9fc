//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::config::secret_string;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use spo_exporter::config::loader::load_config;
///
/// let config = load_config("spo-exporter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    // Check if file exists
    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    // Read file contents
    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from a TOML file, falling back to defaults if it is absent
///
/// Environment overrides and validation apply in both cases, so a deployment
/// can run from environment variables alone.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        parse_config("")
    }
}

/// Parses configuration from TOML text
///
/// Applies `${VAR}` substitution, environment overrides and validation.
pub fn parse_config(contents: &str) -> Result<ExporterConfig> {
    // Perform environment variable substitution
    let contents = substitute_env_vars(contents)?;

    // Parse TOML
    let mut config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Non-empty value of an environment variable
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Applies environment variable overrides
///
/// The deployment-level settings keep their historical names (`DATABASE_NAME`,
/// `SERVER_NAME`, `SMTP_SERVER_NAME`, `OUTPUT_ROOT`, `API_URL_PREFIX`,
/// `ODBC_UID`, `ODBC_PWD`); the remaining settings use the
/// `SPO_<SECTION>_<KEY>` pattern, which wins over the legacy credential names.
fn apply_env_overrides(config: &mut ExporterConfig) {
    // Application overrides
    if let Some(val) = env_value("SPO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Database overrides
    if let Some(val) = env_value("DATABASE_NAME") {
        config.database.database_name = val;
    }
    if let Some(val) = env_value("SERVER_NAME") {
        config.database.server_name = val;
    }
    if let Some(val) = env_value("SPO_DATABASE_PORT") {
        if let Ok(port) = val.parse() {
            config.database.port = port;
        }
    }
    if let Some(val) = env_value("SPO_DATABASE_USERNAME").or_else(|| env_value("ODBC_UID")) {
        config.database.username = val;
    }
    if let Some(val) = env_value("SPO_DATABASE_PASSWORD").or_else(|| env_value("ODBC_PWD")) {
        config.database.password = Some(secret_string(val));
    }
    if let Some(val) = env_value("SPO_DATABASE_SSL_MODE") {
        config.database.ssl_mode = val;
    }

    // Export overrides
    if let Some(val) = env_value("OUTPUT_ROOT") {
        config.export.output_root = PathBuf::from(val);
    }
    if let Some(val) = env_value("SPO_EXPORT_ATOMIC_WRITES") {
        config.export.atomic_writes = val.parse().unwrap_or(true);
    }

    // Server overrides; an empty prefix is meaningful here
    if let Ok(val) = std::env::var("API_URL_PREFIX") {
        config.server.url_prefix = val;
    }
    if let Some(val) = env_value("SPO_SERVER_PORT") {
        if let Ok(port) = val.parse() {
            config.server.port = port;
        }
    }

    // Alerting overrides
    if let Some(val) = env_value("SMTP_SERVER_NAME") {
        config.alerting.smtp_server_name = val;
    }
    if let Some(val) = env_value("SPO_ALERTING_ENABLED") {
        config.alerting.enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_value("SPO_ALERTING_TO") {
        config.alerting.to = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Logging overrides
    if let Some(val) = env_value("SPO_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_value("SPO_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SPO_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${SPO_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("SPO_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SPO_LOADER_MISSING_VAR");
        let input = "password = \"${SPO_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("SPO_LOADER_COMMENTED_VAR");
        let input = "# password = \"${SPO_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[database]
server_name = "db.internal"
database_name = "Training_Portal_Test"
ssl_mode = "disable"

[catalog]
sources = ["Litmos"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.database.ssl_mode, "disable");
        assert_eq!(config.catalog.sources, vec!["Litmos"]);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[database\nport = ").unwrap();
        temp_file.flush().unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
