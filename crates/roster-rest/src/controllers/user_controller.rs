//! User management controller.

use crate::{
    extractors::JsonBody,
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use roster_core::{ErrorResponse, RosterError, User, UserId};
use roster_service::UserRequest;
use tracing::debug;

/// Creates the user router, mounted at `{api_prefix}/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/health", get(health))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Every user, in id order", body = [User])
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    debug!("List users request");

    let users = state.user_service.list_users().await?;
    ok(users)
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid fields or malformed JSON", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UserRequest>,
) -> ApiResult<User> {
    debug!("Create user request");

    let user = state.user_service.create_user(request).await?;
    ok(user)
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.get_user(user_id).await?;
    ok(user)
}

/// Replace a user's name and email.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid fields or malformed JSON", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UserRequest>,
) -> ApiResult<User> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.update_user(user_id, request).await?;
    ok(user)
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted, empty body"),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    state.user_service.delete_user(user_id).await?;

    Ok(StatusCode::OK)
}

/// Liveness text of the user API.
#[utoipa::path(
    get,
    path = "/users/health",
    tag = "users",
    responses(
        (status = 200, description = "Service is running", body = String, content_type = "text/plain")
    )
)]
pub async fn health(State(state): State<AppState>) -> &'static str {
    state.user_service.health()
}

/// Helper to parse user ID from path parameter.
fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id)
        .map_err(|_| AppError(RosterError::validation(format!("Invalid user ID: {}", id))))
}
