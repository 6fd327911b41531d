//! # Roster REST
//!
//! REST API layer using Axum.
//! Maps HTTP requests onto the user service and service errors onto HTTP
//! responses.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
