// Utility functions

use crate::types::*;

/// Validates a value against a constraint and returns an error if it fails
pub fn validate<T, F>(value: T, constraint: F, error_message: impl Into<String>) -> MoodResult<T>
where
    F: FnOnce(&T) -> bool,
{
    if constraint(&value) {
        Ok(value)
    } else {
        Err(MoodError::ValidationError(error_message.into()))
    }
}

/// Validates a string against common constraints
pub struct StringValidator;

impl StringValidator {
    /// Validates that a string is not empty
    pub fn not_empty(value: impl Into<String>, param_name: &str) -> MoodResult<String> {
        let value = value.into();
        validate(
            value,
            |s| !s.is_empty(),
            format!("{} cannot be empty", param_name),
        )
    }

    /// Validates that a string has non-whitespace content
    pub fn not_blank(value: impl Into<String>, param_name: &str) -> MoodResult<String> {
        let value = value.into();
        validate(
            value,
            |s| !s.trim().is_empty(),
            format!("{} cannot be blank", param_name),
        )
    }
}
