//! Per-run accounting
//!
//! Counters collected while the coordinator walks the source programs,
//! logged at the end of the run. These are operator-facing numbers: they
//! explain why a case that exists upstream did not arrive downstream.

use crate::core::submit::SubmitOutcome;
use crate::domain::ids::ProgramId;
use tracing::info;

/// Counters for one source program's pass.
#[derive(Debug, Clone, Default)]
pub struct ProgramSummary {
    pub program: String,
    /// Enrollment stubs returned by the origin query.
    pub fetched: usize,
    /// Cases admitted to the queue from this program.
    pub queued: usize,
    /// Sibling enrollments discarded by earliest-wins deduplication.
    pub duplicates_removed: usize,
    /// Cases skipped because their mapped org unit does not exist on the
    /// destination.
    pub skipped_missing_ou: usize,
    /// Cases already claimed by an earlier program.
    pub already_queued: usize,
    /// Cases whose full record could not be fetched from the origin.
    pub fetch_failures: usize,
    /// Program-level failures: unmapped program id or schema fetch failure.
    /// When set, none of the program's cases were considered.
    pub aborted: Option<String>,
}

impl ProgramSummary {
    pub fn new(program: &ProgramId) -> Self {
        Self {
            program: program.to_string(),
            ..Self::default()
        }
    }

    pub fn aborted(program: &ProgramId, reason: impl Into<String>) -> Self {
        Self {
            program: program.to_string(),
            aborted: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Aggregate result of one synchronization run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub programs: Vec<ProgramSummary>,
    /// `None` when nothing was queued or the run was a dry run.
    pub outcome: Option<SubmitOutcome>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn total_queued(&self) -> usize {
        self.programs.iter().map(|p| p.queued).sum()
    }

    /// Whether the run should report failure to the caller.
    pub fn is_failure(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.is_failure())
    }

    /// Emit the end-of-run report through the log.
    pub fn log(&self) {
        for p in &self.programs {
            if let Some(reason) = &p.aborted {
                tracing::error!(program = %p.program, reason = %reason, "Program skipped");
                continue;
            }
            info!(
                program = %p.program,
                fetched = p.fetched,
                queued = p.queued,
                duplicates_removed = p.duplicates_removed,
                skipped_missing_ou = p.skipped_missing_ou,
                already_queued = p.already_queued,
                fetch_failures = p.fetch_failures,
                "Program summary"
            );
        }

        match &self.outcome {
            Some(outcome) => info!(
                total_queued = self.total_queued(),
                outcome = %outcome,
                "Synchronization run finished"
            ),
            None if self.dry_run => info!(
                total_queued = self.total_queued(),
                "Dry run finished, nothing submitted"
            ),
            None => info!("No new data to synchronize"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(id: &str) -> ProgramId {
        ProgramId::new(id).unwrap()
    }

    #[test]
    fn test_total_queued_sums_programs() {
        let mut summary = RunSummary::default();
        let mut a = ProgramSummary::new(&program("progA"));
        a.queued = 3;
        let mut b = ProgramSummary::new(&program("progB"));
        b.queued = 2;
        summary.programs = vec![a, b];
        assert_eq!(summary.total_queued(), 5);
    }

    #[test]
    fn test_failure_tracks_outcome() {
        let mut summary = RunSummary::default();
        assert!(!summary.is_failure());

        summary.outcome = Some(SubmitOutcome::Rejected);
        assert!(summary.is_failure());

        summary.outcome = Some(SubmitOutcome::PartiallyPersisted {
            succeeded: 1,
            failed: vec!["tei1".to_string()],
        });
        assert!(!summary.is_failure());
    }

    #[test]
    fn test_aborted_program() {
        let p = ProgramSummary::aborted(&program("progA"), "no mapping");
        assert_eq!(p.aborted.as_deref(), Some("no mapping"));
        assert_eq!(p.fetched, 0);
    }
}
