//! DHIS2 tracker API adapters
//!
//! Both systems are DHIS2 instances speaking the same tracker API, so a
//! single shared HTTP client underlies two role-specific adapters: the
//! read-only [`OriginClient`] and the write-side [`DestinationClient`].

pub mod client;
pub mod destination;
pub mod models;
pub mod origin;

pub use client::Dhis2Client;
pub use destination::DestinationClient;
pub use origin::OriginClient;
