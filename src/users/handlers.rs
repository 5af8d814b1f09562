//! Protected user resource handlers

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tracing::debug;

use super::models::UserProfile;
use crate::auth::AuthedUser;
use crate::common::{bounded, ApiError, AppState};

/// GET /users
/// Lists every user profile. Elevated callers only.
pub async fn list_users(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    authed.require_admin()?;

    let users = bounded(state.store_timeouts.default, "list", state.users.list()).await?;
    debug!(
        user_id = %authed.user_id(),
        count = users.len(),
        "Listed users"
    );

    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// GET /users/:user_id
/// Returns one profile. A `USER` may only fetch its own.
pub async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    authed.authorize(&user_id)?;

    let user = bounded(
        state.store_timeouts.default,
        "find_by_user_id",
        state.users.find_by_user_id(&user_id),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(UserProfile::from(user)))
}

/// GET /api-1, GET /api-2
/// Authenticated probes
pub async fn protected_probe(authed: AuthedUser) -> Json<serde_json::Value> {
    debug!(user_id = %authed.user_id(), "Protected probe");
    Json(serde_json::json!({ "success": true }))
}
