/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login and the current user
/// - `goals`: Goal CRUD for the authenticated user

pub mod goals;
pub mod health;
pub mod users;
