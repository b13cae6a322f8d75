/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Register new user
/// - `POST /api/v1/auth/login` - Exchange credentials for a bearer token

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tasknest_shared::models::user::UserProfile;
use tasknest_shared::services::accounts::{AccessToken, Registration};
use validator::Validate;

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::extract::{ValidatedForm, ValidatedJson},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Login name
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub full_name: Option<String>,

    #[serde(default)]
    pub disabled: bool,
}

/// Login form
///
/// OAuth2 password-flow fields. `username` may hold either the username or
/// the email address. Extra fields such as `grant_type` are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "alice@example.com",
///   "username": "alice",
///   "password": "pw1",
///   "full_name": "Alice"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the public profile (no password material).
///
/// # Errors
///
/// - `400 Bad Request`: Email or username already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state
        .accounts
        .register(Registration {
            email: req.email,
            username: req.username,
            password: req.password,
            full_name: req.full_name,
            disabled: req.disabled,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=alice&password=pw1
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Incorrect username or password. Unknown users and
///   wrong passwords are indistinguishable.
pub async fn login(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> ApiResult<Json<AccessToken>> {
    let token = state.accounts.login(&form.username, &form.password).await?;
    Ok(Json(token))
}
