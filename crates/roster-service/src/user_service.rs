//! User service trait definition.

use crate::dto::UserRequest;
use async_trait::async_trait;
use roster_core::{RosterResult, User, UserId};

/// Liveness text returned by [`UserService::health`].
pub const HEALTH_MESSAGE: &str = "Application is running with Docker Compose integration!";

/// User service trait.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Lists every user in store order.
    async fn list_users(&self) -> RosterResult<Vec<User>>;

    /// Gets a user by ID, reading through the cache.
    async fn get_user(&self, id: UserId) -> RosterResult<User>;

    /// Validates and creates a new user.
    async fn create_user(&self, request: UserRequest) -> RosterResult<User>;

    /// Validates and overwrites an existing user's name and email.
    async fn update_user(&self, id: UserId, request: UserRequest) -> RosterResult<User>;

    /// Deletes a user and evicts its cache entry.
    async fn delete_user(&self, id: UserId) -> RosterResult<()>;

    /// Fixed liveness message. No side effects.
    fn health(&self) -> &'static str {
        HEALTH_MESSAGE
    }
}
