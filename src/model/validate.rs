//! Small rule-based field validator used by draft/patch validation.

use chrono::{NaiveDate, Utc};

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            field,
            message: message.into(),
        }
    }
}

/// The value must be non-empty after trimming.
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// The value must not exceed `limit` characters.
pub fn max_len(field: &'static str, value: &str, limit: usize) -> Result<(), ValidationError> {
    if value.chars().count() > limit {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", limit),
        ));
    }
    Ok(())
}

/// The date must not be before today (due dates in the past are rejected
/// at entry time; dates already stored are left alone).
pub fn not_past(field: &'static str, date: NaiveDate) -> Result<(), ValidationError> {
    if date < Utc::now().date_naive() {
        return Err(ValidationError::new(field, "must not be in the past"));
    }
    Ok(())
}
