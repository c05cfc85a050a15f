//! Validate config command implementation
//!
//! Validates the configuration file and the mapping dictionary it points
//! at, without contacting either instance.

use crate::config::load_config;
use crate::mapping::MappingDictionary;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config already runs validation
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match MappingDictionary::from_file(&config.sync.mapping_file) {
            Ok(_) => println!("✅ Mapping dictionary loaded: {}", config.sync.mapping_file),
            Err(e) => {
                println!("❌ Failed to load mapping dictionary");
                println!("   Error: {e}");
                return Ok(2);
            }
        }

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Origin: {}", config.origin.base_url);
        println!("  Destination: {}", config.destination.base_url);
        println!("  Programs: {:?}", config.sync.source_programs);
        println!("  Tracked Entity Type: {}", config.sync.tracked_entity_type);
        println!("  Default Period: {}", config.sync.period);
        println!("  Page Size: {}", config.sync.page_size);
        println!("  Payload File: {}", config.sync.payload_file);

        Ok(0)
    }
}
