//! Configuration management for CaseSync.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! CaseSync uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CASESYNC_*` environment variable overrides
//! - Default values for optional settings
//! - Comprehensive validation
//!
//! # Example Configuration
//!
//! ```toml
//! [origin]
//! base_url = "https://origin.example.org"
//! username = "sync_user"
//! password = "${CASESYNC_ORIGIN_PASSWORD}"
//!
//! [destination]
//! base_url = "https://destination.example.org"
//! username = "sync_user"
//! password = "${CASESYNC_DESTINATION_PASSWORD}"
//!
//! [sync]
//! source_programs = ["JRuLW57woOB", "xDsAFnQMmeU"]
//! tracked_entity_type = "QH1LBzGrk5g"
//! mapping_file = "config/mappingDictionary.json"
//! period = "today"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use casesync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("casesync.toml")?;
//! println!("Origin: {}", config.origin.base_url);
//! println!("Programs: {:?}", config.sync.source_programs);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CaseSyncConfig, LoggingConfig, ServerConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
