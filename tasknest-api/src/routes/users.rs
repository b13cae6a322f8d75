/// Current user endpoints
///
/// # Endpoints
///
/// - `GET /api/v1/users/me` - The caller's profile
/// - `PUT /api/v1/users/me` - Partial update of the caller's profile

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tasknest_shared::models::double_option;
use tasknest_shared::models::user::UserProfile;
use tasknest_shared::services::accounts::ProfileChanges;
use validator::Validate;

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::{auth::CurrentUser, extract::ValidatedJson},
};

/// Profile update request
///
/// Absent fields are left unchanged. `full_name: null` clears the name.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: Option<String>,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,

    pub disabled: Option<bool>,
}

impl From<UpdateMeRequest> for ProfileChanges {
    fn from(req: UpdateMeRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            password: req.password,
            full_name: req.full_name,
            disabled: req.disabled,
        }
    }
}

pub async fn read_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserProfile> {
    Json(state.accounts.profile(&user))
}

/// Updates the caller's profile
///
/// A new password is re-hashed before it reaches the store. Changing email
/// or username to one held by another user answers `400`.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<UpdateMeRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.accounts.update_profile(&user, req.into()).await?;
    Ok(Json(profile))
}
