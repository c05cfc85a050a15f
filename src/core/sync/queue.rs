//! First-write-wins synchronization queue
//!
//! Each tracked entity appears at most once per run. Source programs are
//! processed in configured priority order, so the first program that admits
//! a case owns it; later programs see the case as already queued.

use crate::domain::ids::TrackedEntityId;
use crate::domain::payload::{TrackedEntityWrite, TrackerPayload};
use std::collections::HashSet;

/// Admission queue for one synchronization run.
///
/// Insertion order is preserved so the emitted payload is deterministic
/// for a fixed set of server responses.
#[derive(Debug, Default)]
pub struct SyncQueue {
    entries: Vec<TrackedEntityWrite>,
    seen: HashSet<TrackedEntityId>,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the entity is already queued.
    pub fn contains(&self, id: &TrackedEntityId) -> bool {
        self.seen.contains(id)
    }

    /// Admit an entity unless one with the same id is already queued.
    ///
    /// Returns `true` when the entity was admitted, `false` when an earlier
    /// program already claimed it (the new entry is discarded).
    pub fn admit(&mut self, entity: TrackedEntityWrite) -> bool {
        if self.seen.contains(&entity.tracked_entity) {
            return false;
        }
        self.seen.insert(entity.tracked_entity.clone());
        self.entries.push(entity);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the queue into a submission payload, preserving admission
    /// order.
    pub fn into_payload(self) -> TrackerPayload {
        TrackerPayload::new(self.entries)
    }
}
