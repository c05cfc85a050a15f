//! Submission outcome reporting

use crate::adapters::dhis2::models::ImportStats;
use std::fmt;

/// Final disposition of one submission attempt.
///
/// The submission engine never aborts a run with an error: every path
/// reduces to one of these variants, and the caller decides what they mean
/// for analytics and the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every queued entity was persisted (by the batch, or by individual
    /// fallback after a batch rejection).
    FullyPersisted { stats: Option<ImportStats> },
    /// The batch was rejected and only some entities survived individual
    /// fallback. `failed` lists the tracked entity ids that were lost.
    PartiallyPersisted {
        succeeded: usize,
        failed: Vec<String>,
    },
    /// Nothing was persisted: the batch was rejected and every individual
    /// fallback attempt failed too.
    Rejected,
}

impl SubmitOutcome {
    /// Whether at least one entity reached the destination. Analytics
    /// regeneration only makes sense when this holds.
    pub fn any_persisted(&self) -> bool {
        !matches!(self, SubmitOutcome::Rejected)
    }

    /// Whether the run should report a submission failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected)
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::FullyPersisted { stats: Some(stats) } => write!(
                f,
                "fully persisted (created {}, updated {}, ignored {})",
                stats.created, stats.updated, stats.ignored
            ),
            SubmitOutcome::FullyPersisted { stats: None } => write!(f, "fully persisted"),
            SubmitOutcome::PartiallyPersisted { succeeded, failed } => write!(
                f,
                "partially persisted ({} succeeded, {} failed)",
                succeeded,
                failed.len()
            ),
            SubmitOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_persisted() {
        assert!(SubmitOutcome::FullyPersisted { stats: None }.any_persisted());
        assert!(SubmitOutcome::PartiallyPersisted {
            succeeded: 1,
            failed: vec!["tei1".to_string()],
        }
        .any_persisted());
        assert!(!SubmitOutcome::Rejected.any_persisted());
    }

    #[test]
    fn test_is_failure() {
        assert!(SubmitOutcome::Rejected.is_failure());
        assert!(!SubmitOutcome::FullyPersisted { stats: None }.is_failure());
    }

    #[test]
    fn test_display() {
        let outcome = SubmitOutcome::PartiallyPersisted {
            succeeded: 3,
            failed: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            outcome.to_string(),
            "partially persisted (3 succeeded, 2 failed)"
        );
        assert_eq!(SubmitOutcome::Rejected.to_string(), "rejected");
    }
}
