//! Common test utilities for repository integration tests.

use roster_config::DatabaseConfig;
use roster_repository::DatabasePool;
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

/// Test database container wrapper.
///
/// Manages a MySQL testcontainer lifecycle and provides a migrated pool.
pub struct TestDatabase {
    _container: ContainerAsync<Mysql>,
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Starts a fresh MySQL container and applies the migrations.
    pub async fn new() -> Self {
        // The module image allows an empty root password and creates `test`
        let container = Mysql::default()
            .start()
            .await
            .expect("Failed to start MySQL container");

        let port = container
            .get_host_port_ipv4(3306)
            .await
            .expect("Failed to get MySQL port");

        let config = DatabaseConfig {
            url: format!("mysql://root@127.0.0.1:{}/test", port),
            max_connections: 5,
            log_queries: true,
            ..DatabaseConfig::default()
        };

        let pool = Self::connect_with_retry(&config, 30).await;

        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self {
            _container: container,
            pool: Arc::new(pool),
        }
    }

    /// Returns a handle to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }

    /// Connects to the database with retry logic.
    async fn connect_with_retry(config: &DatabaseConfig, max_attempts: u32) -> DatabasePool {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match DatabasePool::new(config).await {
                Ok(pool) => return pool,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!(
                            "Failed to connect to database after {} attempts: {}",
                            max_attempts, e
                        );
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}
