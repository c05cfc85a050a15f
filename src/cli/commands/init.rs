//! Init command implementation
//!
//! Generates a starter configuration file and, optionally, a skeleton
//! mapping dictionary.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "casesync.toml")]
    pub output: String,

    /// Also create a skeleton mapping dictionary
    #[arg(long)]
    pub with_mapping: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing casesync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        if let Err(e) = fs::write(&self.output, SAMPLE_CONFIG) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(2);
        }
        println!("✅ Configuration file created: {}", self.output);

        if self.with_mapping {
            let mapping_path = Path::new("config").join("mappingDictionary.json");
            if mapping_path.exists() && !self.force {
                println!("❌ Mapping dictionary already exists: {}", mapping_path.display());
                println!("   Use --force to overwrite");
                return Ok(2);
            }
            fs::create_dir_all("config")?;
            if let Err(e) = fs::write(&mapping_path, SKELETON_MAPPING) {
                println!("❌ Failed to write mapping dictionary");
                println!("   Error: {e}");
                return Ok(2);
            }
            println!("✅ Mapping dictionary created: {}", mapping_path.display());
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your instance URLs and programs", self.output);
        println!("  2. Create a .env file with credentials:");
        println!("     - Set CASESYNC_ORIGIN_USERNAME and CASESYNC_ORIGIN_PASSWORD");
        println!("     - Set CASESYNC_DESTINATION_USERNAME and CASESYNC_DESTINATION_PASSWORD");
        println!("  3. Fill in the mapping dictionary with your metadata mappings");
        println!("  4. Validate: casesync validate-config");
        println!("  5. Run: casesync sync");
        println!();
        Ok(0)
    }
}

const SAMPLE_CONFIG: &str = r#"# casesync configuration
# DHIS2 tracker case synchronization

[application]
log_level = "info"
dry_run = false

[origin]
base_url = "https://origin.example.org"
username = "${CASESYNC_ORIGIN_USERNAME}"
password = "${CASESYNC_ORIGIN_PASSWORD}"
timeout_seconds = 60

[destination]
base_url = "https://destination.example.org"
username = "${CASESYNC_DESTINATION_USERNAME}"
password = "${CASESYNC_DESTINATION_PASSWORD}"
timeout_seconds = 60

[sync]
# Source program UIDs in priority order; the first program to claim a
# case wins
source_programs = ["programUid1", "programUid2"]
# Destination tracked entity type UID
tracked_entity_type = "trackedEntityTypeUid"
mapping_file = "config/mappingDictionary.json"
payload_file = "payload.json"
page_size = 50
# today, this-week or all-time
period = "today"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#;

const SKELETON_MAPPING: &str = r#"{
  "mappingDictionary": {
    "organisationUnits": {
      "originOrgUnitUid": { "mappedId": "destinationOrgUnitUid" }
    },
    "trackerPrograms": {
      "originProgramUid": { "mappedId": "destinationProgramUid" }
    },
    "trackedEntityAttributesToTEI": {
      "originAttributeUid": { "mappedId": "destinationAttributeUid" }
    },
    "options": {
      "optionUid": { "code": "ORIGIN_CODE", "mappedCode": "DESTINATION_CODE" }
    }
  }
}
"#;
