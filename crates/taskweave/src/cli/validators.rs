//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::{self, TaskId};

/// Validate a task title and return it trimmed.
///
/// Delegates to [`domain::validate_title`] so the CLI and storage apply the
/// same rules.
pub fn validate_title(s: &str) -> Result<String, String> {
    domain::validate_title(s)?;
    Ok(s.trim().to_string())
}

/// Parse a task ID (a positive integer).
pub fn validate_task_id(s: &str) -> Result<TaskId, String> {
    s.parse()
}
