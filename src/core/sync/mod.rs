//! Run orchestration: period selection, deduplication, admission queue,
//! per-run accounting and the coordinator that ties them together.

pub mod coordinator;
pub mod dedup;
pub mod period;
pub mod queue;
pub mod summary;

pub use coordinator::SyncCoordinator;
pub use period::Period;
pub use queue::SyncQueue;
pub use summary::{ProgramSummary, RunSummary};
