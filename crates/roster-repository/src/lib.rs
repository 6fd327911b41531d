//! # Roster Repository
//!
//! Persistence layer for users.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! MySqlUserRepository | InMemoryUserRepository
//!   ↓
//! MySQL (DatabasePool)
//! ```
//!
//! The `users` table is created by the embedded migration in
//! `migrations/0001_create_users.sql`, applied by
//! [`DatabasePool::run_migrations`].

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryUserRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
