// casesync - DHIS2 Tracker Case Synchronization
// Copyright (c) 2026 casesync Contributors
// Licensed under the MIT License

//! # casesync - DHIS2 tracker case synchronization
//!
//! casesync moves newly enrolled public-health cases from one DHIS2 tracker
//! instance to another whose metadata differs, translating identifiers
//! through a mapping dictionary on the way.
//!
//! ## Overview
//!
//! One run:
//! - **Extracts** new enrollments per source program, page by page
//! - **Translates** org units, attributes and option codes into the
//!   destination's dictionary
//! - **Deduplicates** multiple enrollments of a case down to the earliest
//! - **Queues** each case at most once across all programs (first program
//!   to claim it wins)
//! - **Submits** the queue as one batch, retrying entities individually
//!   when the batch is rejected, and triggers analytics regeneration
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (translation, dedup, queueing, submission)
//! - [`adapters`] - DHIS2 HTTP clients for the two instances
//! - [`mapping`] - The mapping dictionary
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use casesync::config::load_config;
//! use casesync::core::sync::{Period, SyncCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("casesync.toml")?;
//!     let coordinator = SyncCoordinator::new(config)?;
//!     let summary = coordinator.run(Period::Today).await?;
//!     println!("Queued {} cases", summary.total_queued());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod mapping;
