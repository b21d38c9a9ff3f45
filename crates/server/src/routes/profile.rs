//! Profile route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tower_sessions::Session;

use crate::error::{AppError, AuthOperation, Result};
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, ProfileUpdate, session_keys};
use crate::routes::auth::UserResponse;
use crate::state::AppState;

/// Merge the given fields into a user's profile.
///
/// When the updated user is the one signed in, the session copy follows so
/// new listings carry the new display name.
pub async fn update(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    session: Session,
    Path(user_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>> {
    let user = state
        .auth()
        .update_profile(&user_id, &update)
        .await
        .map_err(AppError::auth(AuthOperation::Profile))?;

    if current.is_some_and(|c| c.id == user.id) {
        session
            .insert(session_keys::CURRENT_USER, CurrentUser::from(&user))
            .await?;
    }

    Ok(Json(UserResponse::new(user)))
}
