//! Record translation between the two data dictionaries
//!
//! Converts one origin case record into the destination's schema using the
//! mapping dictionary: attribute-id rewrite, option-code value rewrite,
//! org-unit rewrite and enrollment carry-over. Translation is pure and
//! deterministic: the same inputs always yield byte-identical fragments.

use crate::domain::case::{AttributePair, Enrollment};
use crate::domain::ids::{AttributeId, OrgUnitId, ProgramId};
use crate::domain::payload::EnrollmentWrite;
use crate::domain::TrackedEntityRecord;
use crate::domain::TrackedEntityWrite;
use crate::mapping::MappingDictionary;
use std::collections::HashSet;

/// Translate a list of attribute pairs.
///
/// For each pair:
/// - drop it if `allowed` is provided and the id is not a member (only
///   attributes declared on the source program are eligible);
/// - drop it if the id has no destination mapping (warn-logged when
///   `log_unmapped` is set, never an error);
/// - otherwise emit the destination id with the value after option-code
///   rewrite; values matching no known option code pass through verbatim.
pub fn translate_attributes(
    source: &[AttributePair],
    dictionary: &MappingDictionary,
    allowed: Option<&HashSet<AttributeId>>,
    log_unmapped: bool,
) -> Vec<AttributePair> {
    let mut translated = Vec::with_capacity(source.len());

    for pair in source {
        if let Some(allowed) = allowed {
            if !allowed.contains(&pair.attribute) {
                continue;
            }
        }

        match dictionary.map_attribute(&pair.attribute) {
            Some(target_id) => {
                let value = dictionary
                    .map_option_code(&pair.value)
                    .unwrap_or(&pair.value)
                    .to_string();
                translated.push(AttributePair::new(target_id, value));
            }
            None => {
                if log_unmapped {
                    tracing::warn!(
                        attribute = %pair.attribute,
                        "Tracked entity attribute is unmapped, dropping"
                    );
                }
            }
        }
    }

    translated
}

/// Translate one source enrollment into its destination form.
///
/// Status and enrollment timestamp are carried over verbatim; `existing`
/// is a pre-existing destination enrollment UID when one was recovered.
pub fn translate_enrollment(
    source: &Enrollment,
    destination_program: &ProgramId,
    destination_org_unit: &OrgUnitId,
    existing: Option<String>,
    dictionary: &MappingDictionary,
    allowed: Option<&HashSet<AttributeId>>,
) -> EnrollmentWrite {
    EnrollmentWrite {
        program: destination_program.clone(),
        enrollment: existing,
        org_unit: destination_org_unit.clone(),
        status: source.status.clone(),
        enrolled_at: source.enrolled_at.clone(),
        attributes: translate_attributes(&source.attributes, dictionary, allowed, false),
    }
}

/// Translate a full case record into a queued destination entity.
///
/// `winner` is the singleton enrollment chosen by the deduplicator; the
/// destination org unit has already been resolved (and existence-checked)
/// by the caller.
#[allow(clippy::too_many_arguments)]
pub fn translate_case(
    record: &TrackedEntityRecord,
    tracked_entity_type: &str,
    destination_program: &ProgramId,
    destination_org_unit: &OrgUnitId,
    winner: &Enrollment,
    existing_enrollment: Option<String>,
    dictionary: &MappingDictionary,
    allowed: Option<&HashSet<AttributeId>>,
) -> TrackedEntityWrite {
    TrackedEntityWrite {
        tracked_entity: record.tracked_entity.clone(),
        tracked_entity_type: tracked_entity_type.to_string(),
        program: destination_program.clone(),
        org_unit: destination_org_unit.clone(),
        attributes: translate_attributes(&record.attributes, dictionary, allowed, true),
        enrollments: vec![translate_enrollment(
            winner,
            destination_program,
            destination_org_unit,
            existing_enrollment,
            dictionary,
            allowed,
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::TrackedEntityId;

    const DICT: &str = r#"{
        "mappingDictionary": {
            "organisationUnits": {"srcOu": {"mappedId": "/root/destOu"}},
            "trackerPrograms": {"srcProg": {"mappedId": "destProg"}},
            "trackedEntityAttributesToTEI": {
                "A": {"mappedId": "destA"},
                "B": {"mappedId": "destB"}
            },
            "options": {"opt1": {"code": "M", "mappedCode": "MALE"}}
        }
    }"#;

    fn dictionary() -> MappingDictionary {
        MappingDictionary::from_json(DICT).unwrap()
    }

    fn attr(id: &str, value: &str) -> AttributePair {
        AttributePair::new(AttributeId::new(id).unwrap(), value)
    }

    fn allowed(ids: &[&str]) -> HashSet<AttributeId> {
        ids.iter().map(|id| AttributeId::new(*id).unwrap()).collect()
    }

    #[test]
    fn test_attribute_filtering_drops_undeclared() {
        // allowed = {A, B}, source = [{A,"x"},{C,"y"}] -> only A survives
        let dict = dictionary();
        let source = vec![attr("A", "x"), attr("C", "y")];
        let out = translate_attributes(&source, &dict, Some(&allowed(&["A", "B"])), false);
        assert_eq!(out, vec![attr("destA", "x")]);
    }

    #[test]
    fn test_unmapped_attribute_silently_dropped() {
        let dict = dictionary();
        let source = vec![attr("A", "x"), attr("unmapped", "y")];
        let out = translate_attributes(&source, &dict, None, true);
        assert_eq!(out, vec![attr("destA", "x")]);
    }

    #[test]
    fn test_option_code_rewrite() {
        let dict = dictionary();
        let source = vec![attr("A", "M"), attr("B", "X")];
        let out = translate_attributes(&source, &dict, None, false);
        // "M" is a known code, "X" passes through unchanged
        assert_eq!(out, vec![attr("destA", "MALE"), attr("destB", "X")]);
    }

    #[test]
    fn test_translation_is_idempotent() {
        let dict = dictionary();
        let source = vec![attr("A", "M"), attr("B", "plain")];
        let first = translate_attributes(&source, &dict, None, false);
        let second = translate_attributes(&source, &dict, None, false);
        assert_eq!(first, second);
    }

    fn sample_enrollment() -> Enrollment {
        Enrollment {
            enrollment: Some("e1".to_string()),
            program: ProgramId::new("srcProg").unwrap(),
            created_at: Some("2024-03-01T10:00:00.000".to_string()),
            enrolled_at: "2024-03-01T00:00:00.000".to_string(),
            status: "COMPLETED".to_string(),
            attributes: vec![attr("A", "M")],
        }
    }

    #[test]
    fn test_translate_enrollment_carries_status_and_date() {
        let dict = dictionary();
        let program = ProgramId::new("destProg").unwrap();
        let org_unit = OrgUnitId::new("destOu").unwrap();

        let out = translate_enrollment(
            &sample_enrollment(),
            &program,
            &org_unit,
            Some("existing1".to_string()),
            &dict,
            None,
        );

        assert_eq!(out.status, "COMPLETED");
        assert_eq!(out.enrolled_at, "2024-03-01T00:00:00.000");
        assert_eq!(out.enrollment.as_deref(), Some("existing1"));
        assert_eq!(out.attributes, vec![attr("destA", "MALE")]);
    }

    #[test]
    fn test_translate_case_produces_singleton_enrollment() {
        let dict = dictionary();
        let record = TrackedEntityRecord {
            tracked_entity: TrackedEntityId::new("tei1").unwrap(),
            org_unit: OrgUnitId::new("srcOu").unwrap(),
            attributes: vec![attr("A", "x")],
            enrollments: vec![sample_enrollment()],
        };
        let program = ProgramId::new("destProg").unwrap();
        let org_unit = OrgUnitId::new("destOu").unwrap();

        let out = translate_case(
            &record,
            "tet1",
            &program,
            &org_unit,
            &record.enrollments[0],
            None,
            &dict,
            None,
        );

        assert_eq!(out.tracked_entity.as_str(), "tei1");
        assert_eq!(out.tracked_entity_type, "tet1");
        assert_eq!(out.org_unit.as_str(), "destOu");
        assert_eq!(out.enrollments.len(), 1);
        assert!(out.enrollments[0].enrollment.is_none());
    }
}
