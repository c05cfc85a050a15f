//! Mapping dictionary loading and lookups
//!
//! The mapping dictionary is a JSON file translating all origin identifiers
//! and codes into destination equivalents. It is pure data, loaded once per
//! run and read-only afterwards.
//!
//! File shape:
//!
//! ```json
//! {
//!   "mappingDictionary": {
//!     "organisationUnits": {"srcOu": {"mappedId": "/lvl1/lvl2/destOu"}},
//!     "trackerPrograms": {"srcProg": {"mappedId": "destProg"}},
//!     "trackedEntityAttributesToTEI": {"srcAttr": {"mappedId": "destAttr"}},
//!     "options": {"optionId": {"code": "M", "mappedCode": "MALE"}}
//!   }
//! }
//! ```

use crate::domain::ids::{AttributeId, OrgUnitId, ProgramId};
use crate::domain::{Result, SyncError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A plain id-to-id mapping entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappedIdEntry {
    mapped_id: String,
}

/// An option-set entry translating a coded value.
///
/// Entries missing either field are tolerated and simply skipped when the
/// code lookup is built, matching the permissive file format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionEntry {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    mapped_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DictionaryTables {
    #[serde(default)]
    organisation_units: HashMap<String, MappedIdEntry>,
    #[serde(default)]
    tracker_programs: HashMap<String, MappedIdEntry>,
    #[serde(default, rename = "trackedEntityAttributesToTEI")]
    tracked_entity_attributes_to_tei: HashMap<String, MappedIdEntry>,
    #[serde(default)]
    options: HashMap<String, OptionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DictionaryFile {
    mapping_dictionary: DictionaryTables,
}

/// The loaded mapping dictionary with its four lookup tables.
///
/// Any origin id absent from a table is "unmapped": the owning attribute is
/// dropped, an OU is passed through unchanged, and a missing program mapping
/// is a fatal configuration error for that program's entire batch.
#[derive(Debug, Clone)]
pub struct MappingDictionary {
    org_units: HashMap<String, String>,
    programs: HashMap<String, String>,
    attributes: HashMap<String, String>,
    /// Origin option code -> destination option code, flattened from the
    /// option table at load time since lookups are by code, not option id.
    option_codes: HashMap<String, String>,
}

impl MappingDictionary {
    /// Load the dictionary from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a configuration-class error if the file is missing or does
    /// not parse; both abort the run before any network I/O.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SyncError::Mapping(format!(
                "Mapping dictionary file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SyncError::Mapping(format!(
                "Failed to read mapping dictionary {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&contents)
    }

    /// Parse the dictionary from a JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_str(contents).map_err(|e| {
            SyncError::Mapping(format!("Failed to parse mapping dictionary: {e}"))
        })?;

        let tables = file.mapping_dictionary;

        let option_codes = tables
            .options
            .into_values()
            .filter_map(|opt| match (opt.code, opt.mapped_code) {
                (Some(code), Some(mapped)) => Some((code, mapped)),
                _ => None,
            })
            .collect();

        Ok(Self {
            org_units: tables
                .organisation_units
                .into_iter()
                .map(|(k, v)| (k, v.mapped_id))
                .collect(),
            programs: tables
                .tracker_programs
                .into_iter()
                .map(|(k, v)| (k, v.mapped_id))
                .collect(),
            attributes: tables
                .tracked_entity_attributes_to_tei
                .into_iter()
                .map(|(k, v)| (k, v.mapped_id))
                .collect(),
            option_codes,
        })
    }

    /// Translate an origin org unit to its destination UID.
    ///
    /// Mapping values may be full path strings (`/uid1/uid2/uid3`); the last
    /// path segment is the usable destination UID. Returns `None` when the
    /// org unit is unmapped.
    pub fn map_org_unit(&self, source: &OrgUnitId) -> Option<OrgUnitId> {
        self.org_units.get(source.as_str()).map(|mapped| {
            let uid = mapped.rsplit('/').next().unwrap_or(mapped);
            OrgUnitId::new(uid).unwrap_or_else(|_| source.clone())
        })
    }

    /// Translate an origin org unit, falling back to the origin id unchanged.
    ///
    /// The pass-through fallback assumes a shared OU namespace in degraded
    /// configurations; the destination existence guard decides whether the
    /// result is actually usable.
    pub fn resolve_org_unit(&self, source: &OrgUnitId) -> OrgUnitId {
        self.map_org_unit(source).unwrap_or_else(|| source.clone())
    }

    /// Translate an origin program id. A missing entry is a fatal
    /// configuration error for that program's entire batch.
    pub fn map_program(&self, source: &ProgramId) -> Result<ProgramId> {
        self.programs
            .get(source.as_str())
            .map(|mapped| {
                ProgramId::new(mapped.clone())
                    .map_err(|e| SyncError::Mapping(format!("Invalid program mapping: {e}")))
            })
            .transpose()?
            .ok_or_else(|| {
                SyncError::Mapping(format!(
                    "No destination mapping for tracker program '{source}'"
                ))
            })
    }

    /// Translate an origin attribute id. `None` means the attribute is
    /// unmapped and should be dropped.
    pub fn map_attribute(&self, source: &AttributeId) -> Option<AttributeId> {
        self.attributes
            .get(source.as_str())
            .and_then(|mapped| AttributeId::new(mapped.clone()).ok())
    }

    /// Rewrite a coded attribute value. A value matching a known origin
    /// option code yields its destination code; anything else is `None`
    /// and the caller passes the value through verbatim.
    pub fn map_option_code(&self, value: &str) -> Option<&str> {
        self.option_codes.get(value).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mappingDictionary": {
            "organisationUnits": {
                "srcOu1": {"mappedId": "/top/mid/destOu1"},
                "srcOu2": {"mappedId": "destOu2"}
            },
            "trackerPrograms": {
                "srcProg": {"mappedId": "destProg"}
            },
            "trackedEntityAttributesToTEI": {
                "srcAttr": {"mappedId": "destAttr"}
            },
            "options": {
                "opt1": {"code": "M", "mappedCode": "MALE"},
                "opt2": {"code": "F", "mappedCode": "FEMALE"},
                "broken": {"code": "X"}
            }
        }
    }"#;

    fn dictionary() -> MappingDictionary {
        MappingDictionary::from_json(SAMPLE).unwrap()
    }

    #[test]
    fn test_org_unit_path_tail_extraction() {
        let dict = dictionary();
        let mapped = dict
            .map_org_unit(&OrgUnitId::new("srcOu1").unwrap())
            .unwrap();
        assert_eq!(mapped.as_str(), "destOu1");
    }

    #[test]
    fn test_org_unit_plain_uid_mapping() {
        let dict = dictionary();
        let mapped = dict
            .map_org_unit(&OrgUnitId::new("srcOu2").unwrap())
            .unwrap();
        assert_eq!(mapped.as_str(), "destOu2");
    }

    #[test]
    fn test_org_unit_fallback_passes_through() {
        let dict = dictionary();
        let source = OrgUnitId::new("unmappedOu").unwrap();
        assert!(dict.map_org_unit(&source).is_none());
        assert_eq!(dict.resolve_org_unit(&source), source);
    }

    #[test]
    fn test_program_mapping() {
        let dict = dictionary();
        let mapped = dict.map_program(&ProgramId::new("srcProg").unwrap()).unwrap();
        assert_eq!(mapped.as_str(), "destProg");
    }

    #[test]
    fn test_missing_program_mapping_is_fatal() {
        let dict = dictionary();
        let result = dict.map_program(&ProgramId::new("otherProg").unwrap());
        assert!(matches!(result, Err(SyncError::Mapping(_))));
    }

    #[test]
    fn test_attribute_mapping() {
        let dict = dictionary();
        assert_eq!(
            dict.map_attribute(&AttributeId::new("srcAttr").unwrap())
                .unwrap()
                .as_str(),
            "destAttr"
        );
        assert!(dict
            .map_attribute(&AttributeId::new("otherAttr").unwrap())
            .is_none());
    }

    #[test]
    fn test_option_code_rewrite() {
        let dict = dictionary();
        assert_eq!(dict.map_option_code("M"), Some("MALE"));
        assert_eq!(dict.map_option_code("F"), Some("FEMALE"));
        // Unknown codes pass through at the caller
        assert_eq!(dict.map_option_code("X"), None);
    }

    #[test]
    fn test_incomplete_option_entries_skipped() {
        // "broken" has no mappedCode and must not poison the table
        let dict = dictionary();
        assert!(dict.map_option_code("X").is_none());
    }

    #[test]
    fn test_missing_file_is_mapping_error() {
        let result = MappingDictionary::from_file("/nonexistent/mapping.json");
        assert!(matches!(result, Err(SyncError::Mapping(_))));
    }

    #[test]
    fn test_empty_tables_tolerated() {
        let dict = MappingDictionary::from_json(r#"{"mappingDictionary": {}}"#).unwrap();
        assert!(dict
            .map_org_unit(&OrgUnitId::new("anything").unwrap())
            .is_none());
    }
}
