/// Middleware modules for the API server
///
/// - `auth`: bearer token resolution for protected routes
/// - `extract`: body extractors that validate before the handler runs

pub mod auth;
pub mod extract;
