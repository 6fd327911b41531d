//! # Roster Service
//!
//! The user service and the cache it reads through and writes through.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::UserServiceImpl;
pub use user_service::*;
