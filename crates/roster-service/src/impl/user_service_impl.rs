//! User service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{validate_user_fields, UserRequest};
use crate::user_service::UserService;
use async_trait::async_trait;
use roster_core::{NewUser, RosterError, RosterResult, User, UserId};
use roster_repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User service over a store and a cache.
///
/// Reads go cache first, then the store on a miss. Writes go to the store
/// first, then the cache. The cache fails open: its errors are logged and
/// never fail a request.
pub struct UserServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheInterface>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(user_repository: Arc<dyn UserRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            user_repository,
            cache,
        }
    }

    /// Cached copy of a user. A failed read counts as a miss.
    async fn cached_user(&self, id: UserId) -> Option<User> {
        match self.cache.get::<User>(&cache_keys::user_by_id(id)).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Cache read failed for user {}, falling back to store: {}", id, e);
                None
            }
        }
    }

    async fn cache_user(&self, user: &User) {
        if let Err(e) = self.cache.set(&cache_keys::user_by_id(user.id), user).await {
            warn!("Cache write failed for user {}: {}", user.id, e);
        }
    }

    /// Fails with every field violation before any store call.
    fn check_fields(request: &UserRequest) -> RosterResult<()> {
        let errors = validate_user_fields(&request.name, &request.email);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RosterError::invalid_fields(errors))
        }
    }

    async fn evict_user(&self, id: UserId) {
        if let Err(e) = self.cache.delete(&cache_keys::user_by_id(id)).await {
            warn!("Cache delete failed for user {}: {}", id, e);
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn list_users(&self) -> RosterResult<Vec<User>> {
        debug!("Listing users");
        self.user_repository.find_all().await
    }

    async fn get_user(&self, id: UserId) -> RosterResult<User> {
        debug!("Getting user: {}", id);

        if let Some(cached) = self.cached_user(id).await {
            debug!("Cache hit for user: {}", id);
            return Ok(cached);
        }

        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        self.cache_user(&user).await;
        Ok(user)
    }

    async fn create_user(&self, request: UserRequest) -> RosterResult<User> {
        debug!("Creating user");

        Self::check_fields(&request)?;

        let saved = self.user_repository.save(&NewUser::from(request)).await?;
        self.cache_user(&saved).await;

        info!("User created: {}", saved.id);
        Ok(saved)
    }

    async fn update_user(&self, id: UserId, request: UserRequest) -> RosterResult<User> {
        debug!("Updating user: {}", id);

        Self::check_fields(&request)?;

        let mut user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        user.apply(NewUser::from(request));

        let updated = self.user_repository.update(&user).await?;
        self.cache_user(&updated).await;

        info!("User updated: {}", id);
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user: {}", id);

        if !self.user_repository.exists_by_id(id).await? {
            return Err(RosterError::not_found("User", id));
        }

        // A concurrent delete may win between the check and here
        if !self.user_repository.delete_by_id(id).await? {
            return Err(RosterError::not_found("User", id));
        }

        self.evict_user(id).await;

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}
