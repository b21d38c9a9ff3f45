//! ECO Maze handlers. Progress is the user's level.

use axum::{Json, extract::State};
use serde::Serialize;

use ecothread_core::maze::MazeProgress;

use crate::error::{AppError, AuthOperation, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::User;
use crate::state::AppState;

/// New level plus the matching maze position.
#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub success: bool,
    pub user: User,
    pub maze: MazeProgress,
}

/// Progress for the signed-in user; visitors stand at the entrance.
pub async fn show(
    State(app): State<AppState>,
    OptionalAuth(current): OptionalAuth,
) -> Result<Json<MazeProgress>> {
    let level = match current {
        Some(current) => Some(
            app.auth()
                .get_user(current.id)
                .await
                .map_err(AppError::auth(AuthOperation::Session))?
                .current_level,
        ),
        None => None,
    };

    Ok(Json(MazeProgress::from_level(level)))
}

/// Move one step further through the maze.
pub async fn advance(
    State(app): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<AdvanceResponse>> {
    let user = app
        .auth()
        .increment_level(current.id)
        .await
        .map_err(AppError::auth(AuthOperation::Session))?;

    let maze = MazeProgress::from_level(Some(user.current_level));
    Ok(Json(AdvanceResponse {
        success: true,
        user,
        maze,
    }))
}
