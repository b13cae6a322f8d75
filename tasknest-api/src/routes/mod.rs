/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Welcome and health check endpoints
/// - `auth`: Registration and login
/// - `users`: The caller's own profile
/// - `tasks`: Per-user task CRUD

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
