//! Cache key generators for consistent key naming.

use roster_core::UserId;

/// Prefix of every user entry.
pub const USER_PREFIX: &str = "user:";

/// Generate a cache key for a user by ID, e.g. `user:42`.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("{}{}", USER_PREFIX, id)
}
