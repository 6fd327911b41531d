//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{ErrorResponse, RosterError};
use tracing::{error, warn};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub RosterError);

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        } else {
            warn!(code = self.0.error_code(), "Request rejected: {}", self.0);
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a 200 JSON response.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RosterError::not_found("User", 1), StatusCode::NOT_FOUND),
            (RosterError::validation("bad"), StatusCode::BAD_REQUEST),
            (RosterError::conflict("dup"), StatusCode::CONFLICT),
            (RosterError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (RosterError::Cache("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError(err).into_response().status(), expected);
        }
    }
}
