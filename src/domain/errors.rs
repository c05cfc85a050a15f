//! Domain error types
//!
//! This module defines the error hierarchy for CaseSync. All errors are
//! domain-specific and don't expose third-party types from the HTTP layer.

use thiserror::Error;

/// Main CaseSync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors (missing file, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Authentication failure against either system
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Origin-system errors
    #[error("Origin error: {0}")]
    Origin(#[from] OriginError),

    /// Destination-system errors
    #[error("Destination error: {0}")]
    Destination(#[from] DestinationError),

    /// Mapping dictionary errors (missing file, missing program mapping)
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Submission failure after the individual fallback also failed
    #[error("Submission error: {0}")]
    Submission(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Origin-system errors
///
/// Errors that occur when reading from the origin tracker instance.
/// These errors don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum OriginError {
    /// Failed to connect to the origin server
    #[error("Failed to connect to origin server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Tracked entity not found
    #[error("Tracked entity not found: {0}")]
    TrackedEntityNotFound(String),

    /// Program metadata fetch failed
    #[error("Program metadata fetch failed: {0}")]
    ProgramFetchFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

/// Destination-system errors
///
/// Errors that occur when probing or writing to the destination tracker.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// Failed to connect to the destination server
    #[error("Failed to connect to destination server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Batch import was rejected by the server
    #[error("Batch import rejected: {status} - {message}")]
    BatchRejected { status: u16, message: String },

    /// An individual record import failed
    #[error("Import failed for {uid}: {message}")]
    ImportFailed { uid: String, message: String },

    /// Analytics trigger failed (best-effort, never escalated)
    #[error("Analytics trigger failed: {0}")]
    AnalyticsFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

impl SyncError {
    /// Whether this error is an authentication failure against either system.
    ///
    /// Authentication failures map to their own process exit code, so the
    /// CLI needs to distinguish them from every other fatal condition.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            SyncError::Authentication(_)
                | SyncError::Origin(OriginError::AuthenticationFailed(_))
                | SyncError::Destination(DestinationError::AuthenticationFailed(_))
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
