//! # Roster Server Library
//!
//! Composition root and startup helpers for the Roster server binary.

pub mod app;
pub mod startup;

pub use app::*;
