//! Mapping dictionary between the two data dictionaries
//!
//! Static lookup tables (org units, programs, attributes, option codes)
//! loaded once per run from a JSON file. Pure data, no behavior beyond
//! lookups.

pub mod dictionary;

pub use dictionary::MappingDictionary;
