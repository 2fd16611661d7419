//! # Goalsetter API Server Library
//!
//! HTTP surface of the goal tracker: user registration and login, and goal
//! CRUD scoped to the logged-in user.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and session middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
