//! Result type alias for sumo-export
//!
//! This module provides a convenient Result type alias that uses ExportError
//! as the error type.

use super::errors::ExportError;

/// Result type alias for sumo-export operations
///
/// # Examples
///
/// ```
/// use sumo_export::domain::result::Result;
/// use sumo_export::domain::errors::ExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ExportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExportError>;
