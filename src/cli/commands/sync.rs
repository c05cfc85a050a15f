//! Sync command implementation
//!
//! Runs one synchronization pass from the origin instance to the
//! destination.

use crate::config::load_config;
use crate::core::sync::{Period, SyncCoordinator};
use crate::domain::SyncError;
use chrono::NaiveDate;
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - translate and write the payload file without
    /// submitting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override the extraction period (today, this-week, all-time)
    #[arg(long)]
    pub period: Option<String>,

    /// Extract enrollments since an explicit date (overrides --period)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

impl SyncArgs {
    /// Execute the sync command, returning the process exit code.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let selector = self
            .period
            .clone()
            .unwrap_or_else(|| config.sync.period.clone());
        let period = match Period::from_selection(&selector, self.date) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - Nothing will be submitted to the destination");
            println!();
        }

        if !self.yes && !config.application.dry_run {
            println!("Sync Configuration:");
            println!("  Origin: {}", config.origin.base_url);
            println!("  Destination: {}", config.destination.base_url);
            println!("  Programs: {:?}", config.sync.source_programs);
            println!("  Period: {period}");
            println!();
            print!("Proceed with sync? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Sync cancelled.");
                return Ok(0);
            }
        }

        let coordinator = match SyncCoordinator::new(config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize sync");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Starting synchronization...");
        println!();

        let summary = match coordinator.run(period).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!();
        println!("📊 Sync Summary:");
        for p in &summary.programs {
            if let Some(reason) = &p.aborted {
                println!("  Program {}: skipped ({reason})", p.program);
                continue;
            }
            println!(
                "  Program {}: fetched {}, queued {}, duplicates removed {}, \
                 missing OU {}, already queued {}, fetch failures {}",
                p.program,
                p.fetched,
                p.queued,
                p.duplicates_removed,
                p.skipped_missing_ou,
                p.already_queued,
                p.fetch_failures
            );
        }
        match &summary.outcome {
            Some(outcome) => println!("  Submission: {outcome}"),
            None if summary.dry_run => println!("  Submission: skipped (dry run)"),
            None => println!("  Submission: skipped (nothing to sync)"),
        }

        if summary.is_failure() {
            Ok(3)
        } else {
            Ok(0)
        }
    }
}

/// Map a fatal run error to the documented exit codes: authentication
/// failures exit 1, configuration problems exit 2, submission failures
/// exit 3, anything else exits 1.
fn exit_code_for(error: &SyncError) -> i32 {
    if error.is_authentication() {
        return 1;
    }
    match error {
        SyncError::Configuration(_) | SyncError::Mapping(_) => 2,
        SyncError::Submission(_) => 3,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            exit_code_for(&SyncError::Authentication("bad creds".to_string())),
            1
        );
        assert_eq!(
            exit_code_for(&SyncError::Configuration("missing field".to_string())),
            2
        );
        assert_eq!(
            exit_code_for(&SyncError::Mapping("unmapped program".to_string())),
            2
        );
        assert_eq!(
            exit_code_for(&SyncError::Submission("rejected".to_string())),
            3
        );
        assert_eq!(
            exit_code_for(&SyncError::Other("something else".to_string())),
            1
        );
    }
}
