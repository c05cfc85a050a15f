//! Core synchronization engine
//!
//! The pure pieces (translation, deduplication, queueing) live next to the
//! orchestration that wires them to the two tracker instances.

pub mod submit;
pub mod sync;
pub mod translate;

pub use submit::{SubmissionEngine, SubmitOutcome};
pub use sync::{Period, RunSummary, SyncCoordinator};
