//! Configuration schema types
//!
//! This module defines the configuration structure for CaseSync. One TOML
//! file describes both tracker instances, the sync settings (programs,
//! mapping file, time window) and logging.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main CaseSync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Origin tracker instance (read-only source of case records)
    pub origin: ServerConfig,

    /// Destination tracker instance (receives translated records)
    pub destination: ServerConfig,

    /// Synchronization settings
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CaseSyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.origin.validate("origin")?;
        self.destination.validate("destination")?;
        self.sync.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (translate and write the payload file, skip submission)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Connection settings for one tracker instance.
///
/// The same shape is used for origin and destination; both authenticate
/// with basic auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server, up to and excluding `/api`
    pub base_url: String,

    /// Username for basic authentication
    pub username: String,

    /// Password for basic authentication
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ServerConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err(format!("{section}.base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "{section}.base_url must start with http:// or https://"
            ));
        }

        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(format!("{section}.base_url is not a valid URL: {e}"));
        }

        if self.username.is_empty() {
            return Err(format!("{section}.username cannot be empty"));
        }

        if self.password.expose_secret().is_empty() {
            return Err(format!("{section}.password cannot be empty"));
        }

        if self.timeout_seconds == 0 {
            return Err(format!("{section}.timeout_seconds must be > 0"));
        }

        Ok(())
    }
}

/// Synchronization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Source program UIDs in priority order. Earlier programs are processed
    /// first and win outright when the same case appears under several.
    pub source_programs: Vec<String>,

    /// Destination tracked entity type UID applied to every queued record
    pub tracked_entity_type: String,

    /// Path to the mapping dictionary JSON file
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,

    /// Path of the payload audit artifact written before submission
    #[serde(default = "default_payload_file")]
    pub payload_file: String,

    /// Page size for the paginated enrollment fetch
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Default period selector (today, this-week, all-time); the CLI
    /// `--period` flag overrides this
    #[serde(default = "default_period")]
    pub period: String,
}

impl SyncConfig {
    fn validate(&self) -> Result<(), String> {
        if self.source_programs.is_empty() {
            return Err("sync.source_programs cannot be empty".to_string());
        }

        if self.tracked_entity_type.is_empty() {
            return Err("sync.tracked_entity_type cannot be empty".to_string());
        }

        if self.mapping_file.is_empty() {
            return Err("sync.mapping_file cannot be empty".to_string());
        }

        if !(1..=1000).contains(&self.page_size) {
            return Err(format!(
                "sync.page_size must be between 1 and 1000, got {}",
                self.page_size
            ));
        }

        let valid_periods = ["today", "this-week", "all-time"];
        if !valid_periods.contains(&self.period.as_str()) {
            return Err(format!(
                "Invalid sync.period '{}'. Must be one of: {}",
                self.period,
                valid_periods.join(", ")
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_mapping_file() -> String {
    "config/mappingDictionary.json".to_string()
}

fn default_payload_file() -> String {
    "payload.json".to_string()
}

fn default_page_size() -> usize {
    50
}

fn default_period() -> String {
    "today".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
