//! Origin-side case models
//!
//! These types mirror the tracker API shapes returned by the origin system:
//! a tracked entity (case) with its attribute pairs and enrollments. They are
//! read-only inputs to the sync engine.

use crate::domain::ids::{AttributeId, OrgUnitId, ProgramId, TrackedEntityId};
use serde::{Deserialize, Serialize};

/// One (attribute, value) pair on a case or enrollment.
///
/// The value is kept as an opaque string; coded values are rewritten during
/// translation via the option table, everything else passes through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair {
    /// Attribute identifier
    pub attribute: AttributeId,

    /// Attribute value (opaque, possibly an option code)
    pub value: String,
}

impl AttributePair {
    /// Create a new attribute pair
    pub fn new(attribute: AttributeId, value: impl Into<String>) -> Self {
        Self {
            attribute,
            value: value.into(),
        }
    }
}

/// One program participation instance for a case.
///
/// The enrollment status is enumerated on the server (ACTIVE/COMPLETED/
/// CANCELLED) but the engine treats it as an opaque pass-through for the
/// winning enrollment, so it stays a plain string here. Timestamps are kept
/// in their wire form; the deduplicator parses `created_at` when it needs
/// a chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Enrollment UID assigned by the origin
    #[serde(default)]
    pub enrollment: Option<String>,

    /// Program this enrollment belongs to
    pub program: ProgramId,

    /// Creation timestamp (used for earliest-wins deduplication)
    #[serde(default)]
    pub created_at: Option<String>,

    /// Enrollment timestamp, carried over verbatim to the destination
    pub enrolled_at: String,

    /// Enrollment status, carried over verbatim for the winner
    #[serde(default = "default_status")]
    pub status: String,

    /// Attribute pairs scoped to the enrollment
    #[serde(default)]
    pub attributes: Vec<AttributePair>,
}

fn default_status() -> String {
    "ACTIVE".to_string()
}

/// A full tracked entity (case) record as fetched from the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityRecord {
    /// Origin-assigned case UID
    pub tracked_entity: TrackedEntityId,

    /// Organisation unit owning the case at time of read
    pub org_unit: OrgUnitId,

    /// Entity-level attribute pairs
    #[serde(default)]
    pub attributes: Vec<AttributePair>,

    /// All enrollments of this case, across programs
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}
