//! # Goalsetter Shared Library
//!
//! Core of the goal-tracking service: the in-memory data store and the
//! authentication/authorization layer built on top of it.
//!
//! ## Module Organization
//!
//! - `store`: In-memory collections for users and goals
//! - `models`: User and goal records
//! - `auth`: Passwords, session tokens, session resolution, ownership checks

pub mod auth;
pub mod models;
pub mod store;

/// Current version of the Goalsetter shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
