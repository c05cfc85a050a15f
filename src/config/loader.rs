//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CaseSyncConfig;
use crate::config::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CaseSyncConfig
/// 4. Applies environment variable overrides (CASESYNC_* prefix)
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
/// use casesync::config::load_config;
///
/// let config = load_config("casesync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CaseSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: CaseSyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config
        .validate()
        .map_err(|e| SyncError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Don't process env vars in comments
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
                    let placeholder = format!("${{{var_name}}}");
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
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the CASESYNC_* prefix
///
/// Environment variables follow the pattern: CASESYNC_<SECTION>_<KEY>
/// For example: CASESYNC_ORIGIN_BASE_URL, CASESYNC_SYNC_PERIOD
fn apply_env_overrides(config: &mut CaseSyncConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("CASESYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Origin overrides
    if let Ok(val) = std::env::var("CASESYNC_ORIGIN_BASE_URL") {
        config.origin.base_url = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_ORIGIN_USERNAME") {
        config.origin.username = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_ORIGIN_PASSWORD") {
        config.origin.password = secret_string(val);
    }

    // Destination overrides
    if let Ok(val) = std::env::var("CASESYNC_DESTINATION_BASE_URL") {
        config.destination.base_url = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_DESTINATION_USERNAME") {
        config.destination.username = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_DESTINATION_PASSWORD") {
        config.destination.password = secret_string(val);
    }

    // Sync overrides
    if let Ok(val) = std::env::var("CASESYNC_SYNC_MAPPING_FILE") {
        config.sync.mapping_file = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_SYNC_PAYLOAD_FILE") {
        config.sync.payload_file = val;
    }
    if let Ok(val) = std::env::var("CASESYNC_SYNC_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.sync.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("CASESYNC_SYNC_PERIOD") {
        config.sync.period = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CASESYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CASESYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
