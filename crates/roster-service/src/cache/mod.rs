//! Caching infrastructure for the service layer.
//!
//! A string-keyed cache abstraction with Redis and in-memory backends. One
//! entry per user, keyed by [`cache_keys::user_by_id`], stored without
//! expiry.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::InMemoryCache;
pub use redis_cache::RedisCacheService;
