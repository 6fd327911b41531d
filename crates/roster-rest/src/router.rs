//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    middleware::logging_middleware,
    openapi::api_doc,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware, Router,
};
use roster_config::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa_swagger_ui::SwaggerUi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Creates the main application router.
///
/// User endpoints live under `{api_prefix}/users`; `/health`, `/swagger-ui`
/// and `/api-docs/openapi.json` sit at the root.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let users_path = format!("{}/users", server_config.api_prefix.trim_end_matches('/'));

    let api_router = Router::new()
        .nest(&users_path, user_controller::router())
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .merge(health_controller::router())
        .merge(api_router)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api_doc(&server_config.api_prefix)),
        )
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware))
                .layer(PropagateRequestIdLayer::new(request_id)),
        );

    info!(
        "Router created with user endpoints at {} and Swagger UI at /swagger-ui",
        users_path
    );
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
