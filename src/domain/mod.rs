//! Domain models and types for CaseSync.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TrackedEntityId`], [`ProgramId`],
//!   [`OrgUnitId`], [`AttributeId`])
//! - **Origin-side models** ([`TrackedEntityRecord`], [`Enrollment`])
//! - **Destination payload models** ([`TrackerPayload`], [`TrackedEntityWrite`])
//! - **Error types** ([`SyncError`], [`OriginError`], [`DestinationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! CaseSync uses the newtype pattern for identifiers to prevent mixing
//! different ID types:
//!
//! ```rust
//! use casesync::domain::{OrgUnitId, ProgramId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let org_unit = OrgUnitId::new("O6uvpzGd5pu")?;
//! let program = ProgramId::new("JRuLW57woOB")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: OrgUnitId = program;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod case;
pub mod errors;
pub mod ids;
pub mod payload;
pub mod result;

// Re-export commonly used types for convenience
pub use case::{AttributePair, Enrollment, TrackedEntityRecord};
pub use errors::{DestinationError, OriginError, SyncError};
pub use ids::{AttributeId, OrgUnitId, ProgramId, TrackedEntityId};
pub use payload::{EnrollmentWrite, TrackedEntityWrite, TrackerPayload};
pub use result::Result;
