//! MySQL user repository implementation.

use crate::{traits::UserRepository, DatabasePool};
use async_trait::async_trait;
use roster_core::{NewUser, RosterError, RosterResult, User, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

/// MySQL user repository implementation.
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::new(row.id), row.name, row.email)
    }
}

/// Maps a unique-key violation on `email` to a readable conflict.
fn map_write_error(err: sqlx::Error, email: &str) -> RosterError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RosterError::conflict(format!("Email already exists: {}", email))
        }
        _ => RosterError::from(err),
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn save(&self, user: &NewUser) -> RosterResult<User> {
        debug!("Saving new user");

        // MySQL has no RETURNING; the generated key comes back on the result
        let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .execute(self.pool.inner())
            .await
            .map_err(|e| map_write_error(e, &user.email))?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| RosterError::internal("Generated id out of range"))?;

        info!("Inserted user {}", id);
        Ok(user.clone().with_id(UserId::new(id)))
    }

    async fn update(&self, user: &User) -> RosterResult<User> {
        debug!("Updating user: {}", user.id);

        sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.id.into_inner())
            .execute(self.pool.inner())
            .await
            .map_err(|e| map_write_error(e, &user.email))?;

        // rows_affected is 0 for an unchanged row, so re-read to tell that
        // apart from a missing one
        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| RosterError::not_found("User", user.id))
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> RosterResult<Vec<User>> {
        debug!("Finding all users");

        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>> {
        debug!("Finding user by email");

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email FROM users WHERE LOWER(email) = LOWER(?)",
        )
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn exists_by_email(&self, email: &str) -> RosterResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER(?)")
                .bind(email)
                .fetch_one(self.pool.inner())
                .await?;

        Ok(count > 0)
    }

    async fn exists_by_id(&self, id: UserId) -> RosterResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;

        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<bool> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> RosterResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(self.pool.inner())
            .await?;

        info!("Deleted {} users", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn count(&self) -> RosterResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(count as u64)
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
