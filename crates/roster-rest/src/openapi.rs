//! OpenAPI documentation configuration.

use roster_core::{ErrorResponse, FieldError, User, UserId};
use roster_service::UserRequest;
use utoipa::openapi::server::Server;
use utoipa::OpenApi;

/// OpenAPI documentation for the user API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        description = "CRUD API for users with a read-through cache",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::user_controller::health,
    ),
    components(schemas(UserId, User, UserRequest, ErrorResponse, FieldError)),
    tags(
        (name = "users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Builds the document with the configured API prefix as its server.
#[must_use]
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(api_prefix)]);
    doc
}
