//! Anonymous endpoints
//!
//! POST /api/public/ideas/{id}/thumbs-up   - throttled per IP
//! POST /api/public/ideas/{id}/reactions   - `{ "emoji": "🔥" }`, throttled per IP
//! GET  /api/public/boards/{board_id}/ideas - visible columns and fields only

use axum::Json;
use axum::extract::{Path, State};
use shared::ApiResponse;
use shared::models::{EmojiReaction, PublicIdea, ReactionCreate, ThumbsUpCount};

use super::ApiResult;
use crate::auth::ClientIp;
use crate::ideas::service as ideas;
use crate::reactions::service as reactions;
use crate::state::AppState;

pub async fn thumbs_up(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(id): Path<i64>,
) -> ApiResult<ThumbsUpCount> {
    let thumbs_up = reactions::add_thumbs_up(&state, id, &ip).await?;
    Ok(ApiResponse::success(ThumbsUpCount { thumbs_up }))
}

pub async fn add_reaction(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(id): Path<i64>,
    Json(payload): Json<ReactionCreate>,
) -> ApiResult<Vec<EmojiReaction>> {
    let reactions = reactions::add_emoji_reaction(&state, id, &ip, &payload.emoji).await?;
    Ok(ApiResponse::success(reactions))
}

pub async fn list_ideas(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> ApiResult<Vec<PublicIdea>> {
    let ideas = ideas::list_public_ideas(&state, board_id).await?;
    Ok(ApiResponse::success(ideas))
}
