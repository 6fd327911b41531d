//! Validation utilities.

use crate::FieldError;
use validator::ValidationErrors;

/// Flattens `validator::ValidationErrors` into a list of field errors.
///
/// The list is ordered by field name so responses are stable.
#[must_use]
pub fn validation_errors_to_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();

    field_errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    field_errors
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a string holds only ASCII letters and spaces.
    pub fn letters_and_spaces(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
            return Err(ValidationError::new("letters_and_spaces"));
        }
        Ok(())
    }
}
