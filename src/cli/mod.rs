//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for casesync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// casesync - DHIS2 tracker case synchronization
#[derive(Parser, Debug)]
#[command(name = "casesync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "casesync.toml", env = "CASESYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CASESYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize new cases from the origin instance to the destination
    Sync(commands::sync::SyncArgs),

    /// Validate the configuration file and mapping dictionary
    ValidateConfig(commands::validate::ValidateArgs),

    /// Probe both instances and report connectivity
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from(["casesync", "sync"]);
        assert_eq!(cli.config, "casesync.toml");
        assert!(matches!(cli.command, Commands::Sync(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["casesync", "--config", "custom.toml", "sync"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["casesync", "--log-level", "debug", "sync"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_sync_flags() {
        let cli = Cli::parse_from([
            "casesync",
            "sync",
            "--period",
            "all-time",
            "--dry-run",
            "--yes",
        ]);
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.period.as_deref(), Some("all-time"));
                assert!(args.dry_run);
                assert!(args.yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_sync_date() {
        let cli = Cli::parse_from(["casesync", "sync", "--date", "2024-03-01"]);
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(
                    args.date,
                    chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["casesync", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["casesync", "status"]);
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["casesync", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
