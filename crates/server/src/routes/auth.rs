//! Authentication route handlers.
//!
//! Email and password registration and login. The signed-in user is kept in
//! the session; responses carry the full user record.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, AuthOperation, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, RegistrationProfile, User};
use crate::state::AppState;

/// Registration request body. Profile fields sit next to the credentials.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(flatten)]
    pub profile: RegistrationProfile,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `{"success": true, "user": ...}`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

impl UserResponse {
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

async fn sign_in(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

/// Create an account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth()
        .register(&request.email, &request.password, request.profile)
        .await
        .map_err(AppError::auth(AuthOperation::Register))?;

    sign_in(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::new(user))))
}

/// Sign in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>> {
    let user = state
        .auth()
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Login failed");
            AppError::auth(AuthOperation::Login)(e)
        })?;

    sign_in(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(UserResponse::new(user)))
}

/// Sign out and drop the session's marketplace state.
pub async fn logout(session: Session) -> Result<Json<SuccessResponse>> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Json(SuccessResponse::OK))
}

/// The signed-in user, fresh from the store.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<UserResponse>> {
    let user = state
        .auth()
        .get_user(current.id)
        .await
        .map_err(AppError::auth(AuthOperation::Session))?;

    Ok(Json(UserResponse::new(user)))
}
