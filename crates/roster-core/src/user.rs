//! User entity.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A stored user record.
///
/// `id` is assigned by the store at insert time and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Store-generated identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across all users.
    pub email: String,
}

impl User {
    /// Creates a user from already persisted values.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Overwrites the mutable fields, keeping the identity.
    pub fn apply(&mut self, changes: NewUser) {
        self.name = changes.name;
        self.email = changes.email;
    }
}

/// The caller-supplied part of a user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Attaches a store-generated id.
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}
