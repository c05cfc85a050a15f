//! Payload submission: batch-first with individual fallback, and the
//! outcome type callers use to decide analytics and exit status.

pub mod engine;
pub mod outcome;

pub use engine::SubmissionEngine;
pub use outcome::SubmitOutcome;
