/// Bearer authentication middleware
///
/// Reads `Authorization: Bearer <token>`, resolves it through the
/// [`AuthGate`](tasknest_shared::auth::gate::AuthGate) and stores the active
/// user in the request extensions as [`CurrentUser`]. Handlers behind this
/// layer extract it with `Extension<CurrentUser>`.
///
/// # Responses
///
/// - `401`: header missing or not a bearer credential ("Not authenticated")
/// - `403`: token signature or expiry invalid
/// - `404`: token subject is not a known user
/// - `400`: user is disabled

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tasknest_shared::models::user::User;

use crate::app::AppState;
use crate::error::ApiError;

/// The user resolved from the request's bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let user = state.gate.resolve(token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Extracts the credential from a `Bearer` authorization header
///
/// The scheme is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
