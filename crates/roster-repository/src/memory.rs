//! In-memory user repository.
//!
//! Used by tests and for running the service without MySQL. Ids come from a
//! monotonically increasing sequence starting at 1 and are never reused.

use crate::traits::UserRepository;
use async_trait::async_trait;
use roster_core::{NewUser, RosterError, RosterResult, User, UserId};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug)]
struct State {
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

/// Mutex-guarded in-memory user store.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Emails compare case-insensitively, non-ASCII letters included.
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &NewUser) -> RosterResult<User> {
        let mut state = self.state();

        if state.users.values().any(|u| same_email(&u.email, &user.email)) {
            return Err(RosterError::conflict(format!(
                "Email already exists: {}",
                user.email
            )));
        }

        let id = UserId::new(state.next_id);
        state.next_id += 1;

        let saved = user.clone().with_id(id);
        state.users.insert(id, saved.clone());
        debug!("Saved user {} in memory", id);
        Ok(saved)
    }

    async fn update(&self, user: &User) -> RosterResult<User> {
        let mut state = self.state();

        if !state.users.contains_key(&user.id) {
            return Err(RosterError::not_found("User", user.id));
        }
        if state
            .users
            .values()
            .any(|u| u.id != user.id && same_email(&u.email, &user.email))
        {
            return Err(RosterError::conflict(format!(
                "Email already exists: {}",
                user.email
            )));
        }

        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn find_all(&self) -> RosterResult<Vec<User>> {
        Ok(self.state().users.values().cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>> {
        Ok(self
            .state()
            .users
            .values()
            .find(|u| same_email(&u.email, email))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> RosterResult<bool> {
        Ok(self.state().users.values().any(|u| same_email(&u.email, email)))
    }

    async fn exists_by_id(&self, id: UserId) -> RosterResult<bool> {
        Ok(self.state().users.contains_key(&id))
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<bool> {
        Ok(self.state().users.remove(&id).is_some())
    }

    async fn delete_all(&self) -> RosterResult<u64> {
        let mut state = self.state();
        let removed = state.users.len() as u64;
        state.users.clear();
        Ok(removed)
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.state().users.len() as u64)
    }
}
