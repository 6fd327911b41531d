//! Repository trait definitions.

use async_trait::async_trait;
use roster_core::{NewUser, RosterResult, User, UserId};

/// User repository trait.
///
/// Email uniqueness is enforced by every implementation: a write that would
/// duplicate an existing email fails with `RosterError::Conflict` and leaves
/// the store unchanged.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user, returning it with the store-assigned id.
    async fn save(&self, user: &NewUser) -> RosterResult<User>;

    /// Overwrites name and email of an existing user.
    ///
    /// Fails with `NotFound` when no row has `user.id`.
    async fn update(&self, user: &User) -> RosterResult<User>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Returns every user in ascending id order.
    async fn find_all(&self) -> RosterResult<Vec<User>>;

    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>>;

    /// Checks if an email is taken.
    async fn exists_by_email(&self, email: &str) -> RosterResult<bool>;

    /// Checks if a user with this id exists.
    async fn exists_by_id(&self, id: UserId) -> RosterResult<bool>;

    /// Deletes a user by ID. Returns whether a row was removed.
    async fn delete_by_id(&self, id: UserId) -> RosterResult<bool>;

    /// Deletes every user. Returns the number of rows removed.
    async fn delete_all(&self) -> RosterResult<u64>;

    /// Counts all users.
    async fn count(&self) -> RosterResult<u64>;
}
