//! Composition root.
//!
//! The only place where concrete store and cache types are chosen. Everything
//! downstream receives them as `Arc<dyn UserRepository>` and
//! `Arc<dyn CacheInterface>`.

use axum::Router;
use roster_config::{AppConfig, ServerConfig};
use roster_core::{RosterError, RosterResult};
use roster_repository::{create_pool, DatabasePool, MySqlUserRepository, UserRepository};
use roster_rest::{create_router, AppState};
use roster_service::{CacheInterface, RedisCacheService, UserService, UserServiceImpl};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Wires a store and a cache into the HTTP router.
pub fn build_router(
    user_repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheInterface>,
    server_config: &ServerConfig,
) -> Router {
    let user_service: Arc<dyn UserService> =
        Arc::new(UserServiceImpl::new(user_repository, cache));
    create_router(AppState::new(user_service), server_config)
}

/// A fully wired server, ready to bind.
pub struct Application {
    config: AppConfig,
    router: Router,
    db_pool: Arc<DatabasePool>,
}

impl Application {
    /// Connects MySQL and Redis and builds the router.
    pub async fn build(config: AppConfig) -> RosterResult<Self> {
        let db_pool = create_pool(&config.database).await?;
        if config.database.run_migrations {
            db_pool.run_migrations().await?;
        }

        let redis = RedisCacheService::from_config(&config.redis)?;
        if redis.is_enabled() {
            // Startup still proceeds: the cache fails open
            if let Err(e) = redis.ping().await {
                warn!("Redis is not reachable, requests will bypass the cache: {}", e);
            }
        }

        let user_repository: Arc<dyn UserRepository> =
            Arc::new(MySqlUserRepository::new(db_pool.clone()));
        let cache: Arc<dyn CacheInterface> = Arc::new(redis);

        let router = build_router(user_repository, cache, &config.server);

        Ok(Self {
            config,
            router,
            db_pool,
        })
    }

    /// Serves until Ctrl+C or SIGTERM, then closes the database pool.
    pub async fn run(self) -> RosterResult<()> {
        let addr = self.config.server.addr();
        info!("Starting REST server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RosterError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RosterError::Internal(format!("REST server error: {}", e)));

        self.db_pool.close().await;
        served?;

        info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use roster_repository::InMemoryUserRepository;
    use roster_service::InMemoryCache;
    use tower::ServiceExt;

    fn in_memory_router() -> Router {
        build_router(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCache::new()),
            &ServerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_router_serves_health() {
        let response = in_memory_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_with_disabled_redis() {
        let router = build_router(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(RedisCacheService::disabled()),
            &ServerConfig::default(),
        );

        let response = router
            .oneshot(Request::get("/api/users/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
