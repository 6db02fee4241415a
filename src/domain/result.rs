//! Result type alias for LabTrack

use super::errors::LabError;

/// Result type alias for LabTrack operations
///
/// # Examples
///
/// ```
/// use labtrack::domain::result::Result;
/// use labtrack::domain::errors::LabError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LabError::InvalidArgument("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LabError>;
