//! Result type alias for CaseSync
//!
//! This module provides a convenient Result type alias that uses SyncError
//! as the error type.

use super::errors::SyncError;

/// Result type alias for CaseSync operations
///
/// This is a convenience type alias that uses `SyncError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use casesync::domain::result::Result;
/// use casesync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Configuration("missing mapping file".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
