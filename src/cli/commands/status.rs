//! Status command implementation
//!
//! Probes both configured instances with the authenticated `me` endpoint
//! and reports connectivity, without touching any tracker data.

use crate::adapters::dhis2::client::Dhis2Client;
use crate::config::load_config;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking instance connectivity");

        println!("📊 Instance Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let mut failed = false;
        for (label, server) in [("Origin", &config.origin), ("Destination", &config.destination)] {
            match Dhis2Client::new(server) {
                Ok(client) => match client.probe().await {
                    Ok(()) => println!("✅ {label}: {} reachable, credentials accepted", server.base_url),
                    Err(e) => {
                        println!("❌ {label}: {} unreachable or rejected credentials", server.base_url);
                        println!("   Error: {e}");
                        failed = true;
                    }
                },
                Err(e) => {
                    println!("❌ {label}: could not build client");
                    println!("   Error: {e}");
                    failed = true;
                }
            }
        }

        Ok(if failed { 1 } else { 0 })
    }
}
