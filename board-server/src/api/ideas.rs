//! Owner idea endpoints
//!
//! POST   /api/boards/{board_id}/ideas  - create (appended to its column)
//! GET    /api/boards/{board_id}/ideas  - list in display order
//! PUT    /api/ideas/{id}               - edit text / RICE
//! PUT    /api/ideas/{id}/position      - drag and drop
//! PUT    /api/ideas/{id}/status        - status / in-progress / column
//! DELETE /api/ideas/{id}

use axum::Json;
use axum::extract::{Path, State};
use shared::ApiResponse;
use shared::models::{Idea, IdeaCreate, IdeaUpdate, PositionUpdate, StatusUpdate};

use super::ApiResult;
use crate::auth::{ClientOrigin, CurrentUser};
use crate::ideas::service;
use crate::state::AppState;

pub async fn create_idea(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<i64>,
    Json(payload): Json<IdeaCreate>,
) -> ApiResult<Idea> {
    let idea = service::create_idea(&state, &user, board_id, payload).await?;
    Ok(ApiResponse::success(idea))
}

pub async fn list_ideas(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<i64>,
) -> ApiResult<Vec<Idea>> {
    let ideas = service::list_ideas(&state, &user, board_id).await?;
    Ok(ApiResponse::success(ideas))
}

pub async fn update_idea(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<IdeaUpdate>,
) -> ApiResult<Idea> {
    let idea = service::update_idea_fields(&state, &user, id, payload).await?;
    Ok(ApiResponse::success(idea))
}

pub async fn update_position(
    State(state): State<AppState>,
    user: CurrentUser,
    ClientOrigin(origin): ClientOrigin,
    Path(id): Path<i64>,
    Json(payload): Json<PositionUpdate>,
) -> ApiResult<Idea> {
    let idea = service::update_idea_position(&state, &user, id, payload, origin).await?;
    Ok(ApiResponse::success(idea))
}

pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    ClientOrigin(origin): ClientOrigin,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> ApiResult<Idea> {
    let idea = service::update_idea_status(&state, &user, id, payload, origin).await?;
    Ok(ApiResponse::success(idea))
}

pub async fn delete_idea(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    service::delete_idea(&state, &user, id).await?;
    Ok(ApiResponse::ok())
}
