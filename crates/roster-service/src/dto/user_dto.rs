//! User-related DTOs.

use roster_core::validation::rules::{letters_and_spaces, not_blank};
use roster_core::{validation_errors_to_field_errors, FieldError, NewUser};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Body of create and update requests.
///
/// Absent and `null` fields deserialize as empty strings so they surface as
/// field errors instead of a parse failure. An `id` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        length(min = 3, max = 20, message = "Username must be between 3 and 20 characters"),
        custom(function = "validate_name")
    )]
    #[schema(example = "Alice Smith")]
    pub name: String,

    #[validate(
        email(message = "Email must be a valid format"),
        length(min = 5, max = 254, message = "Email must be between 5 and 254 characters")
    )]
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "alice@example.com")]
    pub email: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank names and names with anything but ASCII letters and spaces fail.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    not_blank(name).map_err(|e| e.with_message("Username must not be blank".into()))?;
    letters_and_spaces(name)
        .map_err(|e| e.with_message("Username must contain only letters and spaces".into()))
}

impl UserRequest {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<UserRequest> for NewUser {
    fn from(request: UserRequest) -> Self {
        NewUser::new(request.name, request.email)
    }
}

/// Checks a name/email pair against the user field rules.
///
/// Returns every violation, ordered by field; empty when the pair is valid.
#[must_use]
pub fn validate_user_fields(name: &str, email: &str) -> Vec<FieldError> {
    let request = UserRequest {
        name: name.to_string(),
        email: email.to_string(),
    };
    match request.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => validation_errors_to_field_errors(&errors),
    }
}
