//! Earliest-wins enrollment deduplication
//!
//! A case fetched from the origin can carry several enrollments in the same
//! program (re-registrations, data-entry mistakes). Only the original
//! enrollment is synchronized: the one with the earliest creation timestamp.

use crate::domain::case::Enrollment;
use crate::domain::ids::ProgramId;
use chrono::NaiveDateTime;

/// Parse a DHIS2 creation timestamp.
///
/// The server emits either RFC 3339 (with offset) or a bare
/// `YYYY-MM-DDTHH:MM:SS.fff` local form depending on version and endpoint.
/// Returns `None` when the value matches neither.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Ordering key for an enrollment's creation timestamp.
///
/// Missing or unparseable timestamps sort after every real one, so a lone
/// dated enrollment always beats an undated sibling.
fn creation_key(enrollment: &Enrollment) -> (bool, Option<NaiveDateTime>) {
    let parsed = enrollment.created_at.as_deref().and_then(parse_timestamp);
    (parsed.is_none(), parsed)
}

/// Outcome of deduplicating one case's enrollments for one program.
#[derive(Debug)]
pub struct DedupResult<'a> {
    /// The single enrollment that will be synchronized.
    pub winner: &'a Enrollment,
    /// How many sibling enrollments in the same program were discarded.
    pub duplicates_removed: usize,
}

/// Select the enrollment to synchronize among a case's enrollments.
///
/// Filters to the given program, then picks the earliest-created one.
/// Ties and fully-undated sets fall back to fetch order, so the result is
/// deterministic for a fixed server response. Returns `None` when the case
/// has no enrollment in the program at all.
pub fn resolve<'a>(enrollments: &'a [Enrollment], program: &ProgramId) -> Option<DedupResult<'a>> {
    let mut matching = enrollments
        .iter()
        .filter(|e| &e.program == program)
        .peekable();

    let first = matching.next()?;
    let mut winner = first;
    let mut winner_key = creation_key(first);
    let mut duplicates = 0;

    for candidate in matching {
        duplicates += 1;
        let key = creation_key(candidate);
        // strict less-than keeps the earlier-fetched enrollment on ties
        if key < winner_key {
            winner = candidate;
            winner_key = key;
        }
    }

    if duplicates > 0 {
        tracing::debug!(
            program = %program,
            duplicates_removed = duplicates,
            winner_created_at = winner.created_at.as_deref().unwrap_or("<none>"),
            "Removed duplicate enrollments"
        );
    }

    Some(DedupResult {
        winner,
        duplicates_removed: duplicates,
    })
}
