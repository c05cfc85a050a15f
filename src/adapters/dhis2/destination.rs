//! Destination-side tracker adapter
//!
//! Write access to the destination instance: the org-unit existence probe,
//! enrollment-id recovery, the batch and individual tracker imports, and
//! the analytics-rebuild trigger.

use super::client::{extract_error_message, Dhis2Client};
use super::models::{EnrollmentPage, ImportReport};
use crate::domain::ids::{OrgUnitId, ProgramId, TrackedEntityId};
use crate::domain::{DestinationError, Result, TrackedEntityWrite, TrackerPayload};

/// Import parameters for the batch upsert: create-or-update semantics,
/// full reporting, per-object atomicity and validation bypass. A failure
/// in one record does not roll back others in the same batch.
const BATCH_IMPORT_PARAMS: [(&str, &str); 5] = [
    ("async", "false"),
    ("importStrategy", "CREATE_AND_UPDATE"),
    ("reportMode", "FULL"),
    ("atomicMode", "OBJECT"),
    ("validationMode", "SKIP"),
];

/// Client for the destination tracker instance.
pub struct DestinationClient {
    client: Dhis2Client,
}

impl DestinationClient {
    /// Create a destination client.
    pub fn new(client: Dhis2Client) -> Self {
        Self { client }
    }

    /// Credential/connectivity probe against the destination.
    pub async fn probe(&self) -> Result<()> {
        self.client.probe().await
    }

    /// Base URL of the destination instance
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Whether an organisation unit exists on the destination.
    ///
    /// HTTP-status-based and fail-closed: a success status means true, any
    /// failure including network errors means false. Skipping a record is
    /// always preferred over submitting to a non-existent OU.
    pub async fn org_unit_exists(&self, org_unit: &OrgUnitId) -> bool {
        match self
            .client
            .get(&format!("organisationUnits/{org_unit}"))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(org_unit = %org_unit, error = %e, "OU existence probe failed");
                false
            }
        }
    }

    /// Recover a pre-existing destination enrollment UID for
    /// (tracked entity, program, org unit), to support update-in-place
    /// rather than always-create.
    ///
    /// Best-effort: any failure yields `None` and the import falls back to
    /// letting the destination create a new enrollment.
    pub async fn find_enrollment(
        &self,
        tracked_entity: &TrackedEntityId,
        program: &ProgramId,
        org_unit: &OrgUnitId,
    ) -> Option<String> {
        let response = self
            .client
            .get("tracker/enrollments")
            .query(&[
                ("trackedEntity", tracked_entity.as_str()),
                ("program", program.as_str()),
                ("orgUnit", org_unit.as_str()),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let page: EnrollmentPage = response.json().await.ok()?;
        page.into_items().into_iter().find_map(|e| e.enrollment)
    }

    /// Submit the full payload as one batch upsert.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::BatchRejected`] with the server's
    /// extracted message when the batch as a whole is refused; the caller
    /// is expected to fall back to individual submissions.
    pub async fn post_batch(&self, payload: &TrackerPayload) -> Result<ImportReport> {
        let response = self
            .client
            .post("tracker")
            .query(&BATCH_IMPORT_PARAMS)
            .json(payload)
            .send()
            .await
            .map_err(|e| DestinationError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DestinationError::BatchRejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            }
            .into());
        }

        response
            .json::<ImportReport>()
            .await
            .map_err(|e| DestinationError::InvalidResponse(e.to_string()).into())
    }

    /// Submit one tracked entity individually (fallback path).
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::ImportFailed`] carrying the case UID and
    /// the server-provided message.
    pub async fn post_single(&self, entity: &TrackedEntityWrite) -> Result<ImportReport> {
        let uid = entity.tracked_entity.to_string();
        let payload = TrackerPayload::single(entity.clone());

        let response = self
            .client
            .post("tracker")
            .query(&[
                ("importStrategy", "CREATE_AND_UPDATE"),
                ("async", "false"),
            ])
            .json(&payload)
            .send()
            .await
            .map_err(|e| DestinationError::ImportFailed {
                uid: uid.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DestinationError::ImportFailed {
                uid,
                message: extract_error_message(&body),
            }
            .into());
        }

        response
            .json::<ImportReport>()
            .await
            .map_err(|e| DestinationError::InvalidResponse(e.to_string()).into())
    }

    /// Trigger the analytics table generation job so synced data appears in
    /// dashboards and reports.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::AnalyticsFailed`]; callers treat this as
    /// best-effort and only log it.
    pub async fn trigger_analytics(&self) -> Result<String> {
        let response = self
            .client
            .post("resourceTables/analytics")
            .query(&[
                ("skipResourceTables", "true"),
                ("skipAggregate", "false"),
                ("skipEvents", "false"),
            ])
            .send()
            .await
            .map_err(|e| DestinationError::AnalyticsFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DestinationError::AnalyticsFailed(format!(
                "analytics trigger returned {status}"
            ))
            .into());
        }

        let body = response.text().await.unwrap_or_default();
        Ok(extract_error_message(&body))
    }
}
