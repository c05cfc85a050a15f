//! Batch submission with individual fallback
//!
//! The queued payload is pushed in a single batch request. When the batch
//! is rejected, every entity is retried as its own single-entity payload so
//! one malformed record cannot sink the whole run. After submission,
//! analytics regeneration is requested whenever at least one entity was
//! persisted.

use crate::adapters::dhis2::destination::DestinationClient;
use crate::core::submit::outcome::SubmitOutcome;
use crate::domain::payload::TrackerPayload;
use tracing::{error, info, warn};

/// Drives submission of one run's payload to the destination.
pub struct SubmissionEngine<'a> {
    destination: &'a DestinationClient,
}

impl<'a> SubmissionEngine<'a> {
    pub fn new(destination: &'a DestinationClient) -> Self {
        Self { destination }
    }

    /// Submit the payload and trigger analytics when anything persisted.
    ///
    /// Submission failures are absorbed into the returned outcome; only the
    /// caller decides whether the outcome fails the run.
    pub async fn submit(&self, payload: &TrackerPayload) -> SubmitOutcome {
        info!(
            tracked_entities = payload.len(),
            "Submitting payload to destination"
        );

        let outcome = match self.destination.post_batch(payload).await {
            Ok(report) => {
                if let Some(stats) = &report.stats {
                    info!(
                        created = stats.created,
                        updated = stats.updated,
                        ignored = stats.ignored,
                        "Batch import succeeded"
                    );
                }
                SubmitOutcome::FullyPersisted {
                    stats: report.stats,
                }
            }
            Err(err) => {
                error!(error = %err, "Batch import failed, retrying entities individually");
                self.submit_individually(payload).await
            }
        };

        if outcome.any_persisted() {
            self.trigger_analytics().await;
        } else {
            warn!("Nothing persisted, skipping analytics regeneration");
        }

        outcome
    }

    /// Retry each entity as its own payload after a batch rejection.
    async fn submit_individually(&self, payload: &TrackerPayload) -> SubmitOutcome {
        let mut succeeded = 0usize;
        let mut failed = Vec::new();

        for entity in &payload.tracked_entities {
            let uid = entity.tracked_entity.as_str().to_string();
            match self.destination.post_single(entity).await {
                Ok(_) => {
                    succeeded += 1;
                    info!(tracked_entity = %uid, "Individual import succeeded");
                }
                Err(err) => {
                    warn!(tracked_entity = %uid, error = %err, "Individual import failed");
                    failed.push(uid);
                }
            }
        }

        if failed.is_empty() {
            info!(succeeded, "All entities persisted via individual fallback");
            SubmitOutcome::FullyPersisted { stats: None }
        } else if succeeded > 0 {
            warn!(
                succeeded,
                failed = failed.len(),
                "Fallback persisted only part of the payload"
            );
            SubmitOutcome::PartiallyPersisted { succeeded, failed }
        } else {
            error!("Every individual import failed, payload rejected");
            SubmitOutcome::Rejected
        }
    }

    /// Best-effort analytics regeneration. A failure here never degrades
    /// the submission outcome: the data is already persisted.
    async fn trigger_analytics(&self) {
        match self.destination.trigger_analytics().await {
            Ok(message) => info!(message = %message, "Analytics regeneration requested"),
            Err(err) => warn!(error = %err, "Analytics regeneration request failed"),
        }
    }
}
