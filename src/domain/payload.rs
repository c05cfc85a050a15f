//! Destination payload models
//!
//! Fully translated records queued for submission. The serialized form is
//! the exact schema of the audit artifact and the tracker import body:
//!
//! ```json
//! {"trackedEntities": [{"trackedEntity": "...", "trackedEntityType": "...",
//!   "program": "...", "orgUnit": "...", "attributes": [...],
//!   "enrollments": [...]}]}
//! ```

use crate::domain::case::AttributePair;
use crate::domain::ids::{OrgUnitId, ProgramId, TrackedEntityId};
use serde::{Deserialize, Serialize};

/// One translated enrollment queued for the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWrite {
    /// Destination program UID
    pub program: ProgramId,

    /// Pre-existing destination enrollment UID, when one was recovered.
    /// `null` means the destination will create a new enrollment.
    pub enrollment: Option<String>,

    /// Destination organisation unit UID
    pub org_unit: OrgUnitId,

    /// Status carried over from the winning source enrollment
    pub status: String,

    /// Enrollment timestamp carried over verbatim
    pub enrolled_at: String,

    /// Translated enrollment-scoped attributes
    pub attributes: Vec<AttributePair>,
}

/// One translated tracked entity queued for the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityWrite {
    /// Case UID (shared namespace with the origin)
    pub tracked_entity: TrackedEntityId,

    /// Destination tracked entity type UID
    pub tracked_entity_type: String,

    /// Destination program UID
    pub program: ProgramId,

    /// Destination organisation unit UID
    pub org_unit: OrgUnitId,

    /// Translated entity-level attributes
    pub attributes: Vec<AttributePair>,

    /// The singleton translated enrollment chosen by the deduplicator
    pub enrollments: Vec<EnrollmentWrite>,
}

/// The tracker import body: all queued entities of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerPayload {
    /// Queued tracked entities, in queue insertion order
    pub tracked_entities: Vec<TrackedEntityWrite>,
}

impl TrackerPayload {
    /// Create a payload from queued entities
    pub fn new(tracked_entities: Vec<TrackedEntityWrite>) -> Self {
        Self { tracked_entities }
    }

    /// Wrap a single entity for an individual fallback submission
    pub fn single(entity: TrackedEntityWrite) -> Self {
        Self {
            tracked_entities: vec![entity],
        }
    }

    /// Number of entities in the payload
    pub fn len(&self) -> usize {
        self.tracked_entities.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.tracked_entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::AttributeId;

    fn sample_entity() -> TrackedEntityWrite {
        TrackedEntityWrite {
            tracked_entity: TrackedEntityId::new("Kj6vYde4LHh").unwrap(),
            tracked_entity_type: "QH1LBzGrk5g".to_string(),
            program: ProgramId::new("dest-prog").unwrap(),
            org_unit: OrgUnitId::new("destOu12345").unwrap(),
            attributes: vec![AttributePair::new(
                AttributeId::new("destAttr").unwrap(),
                "MALE",
            )],
            enrollments: vec![EnrollmentWrite {
                program: ProgramId::new("dest-prog").unwrap(),
                enrollment: None,
                org_unit: OrgUnitId::new("destOu12345").unwrap(),
                status: "ACTIVE".to_string(),
                enrolled_at: "2024-03-01T00:00:00.000".to_string(),
                attributes: vec![],
            }],
        }
    }

    #[test]
    fn test_payload_serializes_artifact_schema() {
        let payload = TrackerPayload::single(sample_entity());
        let value = serde_json::to_value(&payload).unwrap();

        let entity = &value["trackedEntities"][0];
        assert_eq!(entity["trackedEntity"], "Kj6vYde4LHh");
        assert_eq!(entity["trackedEntityType"], "QH1LBzGrk5g");
        assert_eq!(entity["program"], "dest-prog");
        assert_eq!(entity["orgUnit"], "destOu12345");
        assert_eq!(entity["attributes"][0]["attribute"], "destAttr");
        assert_eq!(entity["attributes"][0]["value"], "MALE");

        let enrollment = &entity["enrollments"][0];
        // A missing destination enrollment id serializes as an explicit null
        assert!(enrollment["enrollment"].is_null());
        assert_eq!(enrollment["status"], "ACTIVE");
        assert_eq!(enrollment["enrolledAt"], "2024-03-01T00:00:00.000");
    }

    #[test]
    fn test_payload_round_trips() {
        let payload = TrackerPayload::new(vec![sample_entity()]);
        let json = serde_json::to_string(&payload).unwrap();
        let back: TrackerPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_payload_len_and_empty() {
        assert!(TrackerPayload::new(vec![]).is_empty());
        assert_eq!(TrackerPayload::single(sample_entity()).len(), 1);
    }
}
