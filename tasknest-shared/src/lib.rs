//! # TaskNest Shared Library
//!
//! This crate contains the domain types, storage contracts, caching layer and
//! business logic used by the TaskNest API server.
//!
//! ## Module Organization
//!
//! - `models`: Users and tasks
//! - `store`: Credential and task store contracts (Postgres + in-memory)
//! - `cache`: Read-through cache for task snapshots (Redis + in-memory)
//! - `auth`: Password hashing, bearer tokens, the auth gate, ownership checks
//! - `services`: Task and account orchestration
//! - `db`: Postgres pool and migrations
//! - `error`: Service error taxonomy

pub mod auth;
pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
