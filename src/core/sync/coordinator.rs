//! Synchronization run orchestration
//!
//! One coordinator instance drives one run: credential probes, the
//! per-program extract/translate/queue loop, the payload audit artifact,
//! and finally submission. Source programs are walked in configured
//! priority order so the first program to claim a case wins.

use crate::adapters::dhis2::client::Dhis2Client;
use crate::adapters::dhis2::destination::DestinationClient;
use crate::adapters::dhis2::origin::OriginClient;
use crate::config::schema::CaseSyncConfig;
use crate::core::submit::SubmissionEngine;
use crate::core::sync::dedup;
use crate::core::sync::period::Period;
use crate::core::sync::queue::SyncQueue;
use crate::core::sync::summary::{ProgramSummary, RunSummary};
use crate::core::translate;
use crate::domain::ids::{OrgUnitId, ProgramId};
use crate::domain::payload::TrackerPayload;
use crate::domain::Result;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Drives one synchronization run between the two configured instances.
pub struct SyncCoordinator {
    config: CaseSyncConfig,
    dictionary: crate::mapping::MappingDictionary,
    origin: OriginClient,
    destination: DestinationClient,
}

impl SyncCoordinator {
    /// Build a coordinator from loaded configuration.
    ///
    /// Loads the mapping dictionary eagerly so a malformed dictionary
    /// fails the run before any network traffic.
    pub fn new(config: CaseSyncConfig) -> Result<Self> {
        let dictionary = crate::mapping::MappingDictionary::from_file(&config.sync.mapping_file)?;
        let origin = OriginClient::new(Dhis2Client::new(&config.origin)?, config.sync.page_size);
        let destination = DestinationClient::new(Dhis2Client::new(&config.destination)?);

        Ok(Self {
            config,
            dictionary,
            origin,
            destination,
        })
    }

    /// Execute one full run for the given extraction period.
    ///
    /// # Errors
    ///
    /// Credential or connectivity failures on either instance abort the
    /// run. Everything after the probes degrades per record or per
    /// program and is reported through the returned [`RunSummary`].
    pub async fn run(&self, period: Period) -> Result<RunSummary> {
        self.origin.probe().await?;
        self.destination.probe().await?;

        let today = chrono::Utc::now().date_naive();
        let enrolled_after = period.start_date(today);
        info!(
            period = %period,
            enrolled_after = %enrolled_after,
            origin = %self.origin.base_url(),
            destination = %self.destination.base_url(),
            dry_run = self.config.application.dry_run,
            "Starting synchronization run"
        );

        let mut queue = SyncQueue::new();
        // OU existence answers are memoized for the whole run
        let mut ou_cache: HashMap<OrgUnitId, bool> = HashMap::new();
        let mut programs = Vec::new();

        for source in &self.config.sync.source_programs {
            let program =
                ProgramId::new(source).map_err(crate::domain::SyncError::Configuration)?;
            let summary = self
                .process_program(&program, enrolled_after, &mut queue, &mut ou_cache)
                .await;
            programs.push(summary);
        }

        let mut summary = RunSummary {
            programs,
            outcome: None,
            dry_run: self.config.application.dry_run,
        };

        if queue.is_empty() {
            summary.log();
            return Ok(summary);
        }

        let payload = queue.into_payload();
        self.write_payload_artifact(&payload);

        if self.config.application.dry_run {
            summary.log();
            return Ok(summary);
        }

        let outcome = SubmissionEngine::new(&self.destination)
            .submit(&payload)
            .await;
        summary.outcome = Some(outcome);
        summary.log();
        Ok(summary)
    }

    /// Extract, translate and queue one program's new enrollments.
    ///
    /// An unmapped program id or a failed schema fetch aborts this program
    /// only; record-level failures are counted and skipped.
    async fn process_program(
        &self,
        program: &ProgramId,
        enrolled_after: NaiveDate,
        queue: &mut SyncQueue,
        ou_cache: &mut HashMap<OrgUnitId, bool>,
    ) -> ProgramSummary {
        let destination_program = match self.dictionary.map_program(program) {
            Ok(mapped) => mapped,
            Err(e) => return ProgramSummary::aborted(program, e.to_string()),
        };

        let allowed = match self.origin.fetch_program_attributes(program).await {
            Ok(ids) => ids,
            Err(e) => return ProgramSummary::aborted(program, e.to_string()),
        };

        let stubs = self.origin.fetch_enrollments(program, enrolled_after).await;
        let mut summary = ProgramSummary::new(program);
        summary.fetched = stubs.len();
        info!(program = %program, enrollments = stubs.len(), "Fetched new enrollments");

        for stub in stubs {
            let tracked_entity = stub.tracked_entity;

            if queue.contains(&tracked_entity) {
                debug!(
                    tracked_entity = %tracked_entity,
                    program = %program,
                    "Case already queued by an earlier program"
                );
                summary.already_queued += 1;
                continue;
            }

            let record = match self.origin.fetch_tracked_entity(&tracked_entity).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        tracked_entity = %tracked_entity,
                        error = %e,
                        "Could not fetch tracked entity, skipping"
                    );
                    summary.fetch_failures += 1;
                    continue;
                }
            };

            let Some(resolution) = dedup::resolve(&record.enrollments, program) else {
                // the stub promised an enrollment the full record no
                // longer carries, nothing to sync for this program
                debug!(
                    tracked_entity = %tracked_entity,
                    program = %program,
                    "No enrollment in program on the full record"
                );
                continue;
            };
            summary.duplicates_removed += resolution.duplicates_removed;

            let org_unit = self.dictionary.resolve_org_unit(&record.org_unit);
            if !self.org_unit_exists_cached(&org_unit, ou_cache).await {
                info!(
                    tracked_entity = %tracked_entity,
                    org_unit = %org_unit,
                    "Destination org unit missing, skipping case"
                );
                summary.skipped_missing_ou += 1;
                continue;
            }

            let existing_enrollment = self
                .destination
                .find_enrollment(&tracked_entity, &destination_program, &org_unit)
                .await;

            let entity = translate::translate_case(
                &record,
                &self.config.sync.tracked_entity_type,
                &destination_program,
                &org_unit,
                resolution.winner,
                existing_enrollment,
                &self.dictionary,
                Some(&allowed),
            );

            if queue.admit(entity) {
                summary.queued += 1;
            } else {
                summary.already_queued += 1;
            }
        }

        summary
    }

    async fn org_unit_exists_cached(
        &self,
        org_unit: &OrgUnitId,
        cache: &mut HashMap<OrgUnitId, bool>,
    ) -> bool {
        if let Some(&known) = cache.get(org_unit) {
            return known;
        }
        let exists = self.destination.org_unit_exists(org_unit).await;
        cache.insert(org_unit.clone(), exists);
        exists
    }

    /// Write the queued payload to disk before submission, as an audit
    /// trail of exactly what was sent. A write failure is logged but never
    /// blocks submission.
    fn write_payload_artifact(&self, payload: &TrackerPayload) {
        let path = &self.config.sync.payload_file;
        let serialized = match serde_json::to_string_pretty(payload) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Could not serialize payload artifact");
                return;
            }
        };
        match std::fs::write(path, serialized) {
            Ok(()) => info!(path = %path, tracked_entities = payload.len(), "Wrote payload artifact"),
            Err(e) => warn!(path = %path, error = %e, "Could not write payload artifact"),
        }
    }
}
