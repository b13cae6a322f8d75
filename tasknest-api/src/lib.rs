//! # TaskNest API Server Library
//!
//! This library provides the HTTP surface of TaskNest: a multi-user task
//! manager with bearer-token authentication and a read-through cache.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer authentication and validating extractors
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
