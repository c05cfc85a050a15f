//! Wire DTOs for the DHIS2 tracker API
//!
//! Response shapes shared by the origin and destination adapters. These are
//! deserialization targets only; domain logic works on the types in
//! [`crate::domain`].

use crate::domain::ids::{ProgramId, TrackedEntityId};
use serde::Deserialize;

/// One page of the enrollment search endpoint.
///
/// Newer tracker API versions return the list under `instances`, older ones
/// under `enrollments`. Both are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentPage {
    #[serde(default)]
    pub instances: Option<Vec<EnrollmentStub>>,
    #[serde(default)]
    pub enrollments: Option<Vec<EnrollmentStub>>,
}

impl EnrollmentPage {
    /// The page's items regardless of which key the server used.
    pub fn into_items(self) -> Vec<EnrollmentStub> {
        self.instances
            .or(self.enrollments)
            .unwrap_or_default()
    }
}

/// A lightweight enrollment record from the paginated search.
///
/// Only the fields the engine needs to drive the per-case fetch; the full
/// record comes from the tracked-entity endpoint afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStub {
    /// Case this enrollment belongs to
    pub tracked_entity: TrackedEntityId,

    /// Enrollment UID
    #[serde(default)]
    pub enrollment: Option<String>,

    /// Program UID
    #[serde(default)]
    pub program: Option<ProgramId>,
}

/// Program metadata response carrying the declared attribute schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramMetadata {
    #[serde(default)]
    pub program_tracked_entity_attributes: Vec<ProgramAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAttribute {
    pub tracked_entity_attribute: AttributeRef,
}

#[derive(Debug, Deserialize)]
pub struct AttributeRef {
    pub id: String,
}

/// Import report returned by the tracker import endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub stats: Option<ImportStats>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Create/update counters from a tracker import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImportStats {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub ignored: u64,
    #[serde(default)]
    pub deleted: u64,
}
