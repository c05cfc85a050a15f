//! External integrations
//!
//! Thin I/O wrappers around the two tracker instances. All domain logic
//! lives in [`crate::core`]; the adapters translate HTTP responses into
//! domain types and domain errors.

pub mod dhis2;
