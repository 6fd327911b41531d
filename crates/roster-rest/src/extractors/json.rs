//! JSON body extractor with service-style rejections.
//!
//! Wraps `axum::Json` so malformed bodies, wrong content types and
//! deserialization failures come back as a 400 `VALIDATION_ERROR` in the
//! same error body every other failure uses. Field-level validation is left
//! to the service.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use roster_core::RosterError;
use serde::de::DeserializeOwned;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError(rejection_to_error(&rejection))),
        }
    }
}

fn rejection_to_error(rejection: &JsonRejection) -> RosterError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => format!("Malformed JSON request: {}", other.body_text()),
    };
    RosterError::validation(message)
}
