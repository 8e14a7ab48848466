//! Public feedback: thumbs-up and emoji reactions
//!
//! Order of checks: emoji allow-list, then the idea's public visibility,
//! then the per-IP throttle, then the atomic counter update. A write that
//! does not land hands the throttle window back. The animation is broadcast
//! after the write and the board owner is notified from a detached task.

use shared::live::{FeedbackEvent, FeedbackKind, LiveMessage};
use shared::models::{EmojiReaction, Idea};
use shared::AppError;
use tokio::time::Instant;

use super::emoji;
use super::limiter::FeedbackAction;
use crate::error::{ServiceError, ServiceResult};
use crate::notify::FeedbackNotice;
use crate::state::AppState;

/// The idea, if anonymous visitors can see it: its board is public and its
/// column visible. Anything else reads as a missing idea.
async fn visible_idea(state: &AppState, idea_id: i64) -> ServiceResult<Idea> {
    let idea = state
        .bounded(state.store.find_idea(idea_id))
        .await?
        .ok_or_else(|| AppError::idea_not_found(idea_id))?;
    let board = state.bounded(state.store.find_board(idea.board_id)).await?;

    match board {
        Some(board) if board.is_public && board.shows_column(idea.column) => Ok(idea),
        _ => {
            tracing::debug!(idea_id, board_id = idea.board_id, "Feedback on hidden idea");
            Err(AppError::idea_not_found(idea_id).into())
        }
    }
}

async fn throttle(
    state: &AppState,
    action: FeedbackAction,
    idea_id: i64,
    ip: &str,
) -> Result<Instant, AppError> {
    state
        .limiter
        .check(action, idea_id, ip)
        .await
        .map_err(|remaining| {
            tracing::debug!(idea_id, ip, action = action.as_str(), "Feedback throttled");
            AppError::rate_limited(remaining.as_millis() as u64).with_detail("ideaId", idea_id)
        })
}

/// Keep the recorded call only if the counter was written
async fn settle(
    state: &AppState,
    action: FeedbackAction,
    idea_id: i64,
    ip: &str,
    recorded_at: Instant,
    written: ServiceResult<Option<Idea>>,
) -> ServiceResult<Idea> {
    let err: ServiceError = match written {
        Ok(Some(idea)) => return Ok(idea),
        Ok(None) => AppError::idea_not_found(idea_id).into(),
        Err(e) => e,
    };
    state.limiter.release(action, idea_id, ip, recorded_at).await;
    Err(err)
}

/// addThumbsUp: returns the new count
///
/// Only ideas a public visitor can see accept feedback. The throttle window
/// is charged once the counter is written.
pub async fn add_thumbs_up(state: &AppState, idea_id: i64, ip: &str) -> ServiceResult<u32> {
    let action = FeedbackAction::ThumbsUp;
    visible_idea(state, idea_id).await?;
    let recorded_at = throttle(state, action, idea_id, ip).await?;

    let written = state.bounded(state.store.increment_thumbs_up(idea_id)).await;
    let idea = settle(state, action, idea_id, ip, recorded_at, written).await?;

    state.hub.publish(
        idea.board_id,
        LiveMessage::FeedbackAnimation(FeedbackEvent::thumbs_up(&idea)),
    );
    notify_owner(state, &idea, FeedbackKind::Thumbsup, None);

    tracing::info!(board_id = idea.board_id, idea_id, thumbs_up = idea.thumbs_up, "Thumbs up");
    Ok(idea.thumbs_up)
}

/// addEmojiReaction: returns the updated reaction list
///
/// Same visibility and throttle rules as [`add_thumbs_up`].
pub async fn add_emoji_reaction(
    state: &AppState,
    idea_id: i64,
    ip: &str,
    emoji: &str,
) -> ServiceResult<Vec<EmojiReaction>> {
    let action = FeedbackAction::Emoji;
    let emoji = emoji::validate(emoji)?;
    visible_idea(state, idea_id).await?;
    let recorded_at = throttle(state, action, idea_id, ip).await?;

    let written = state.bounded(state.store.increment_emoji(idea_id, emoji)).await;
    let idea = settle(state, action, idea_id, ip, recorded_at, written).await?;

    state.hub.publish(
        idea.board_id,
        LiveMessage::FeedbackAnimation(FeedbackEvent::emoji(&idea, emoji)),
    );
    notify_owner(state, &idea, FeedbackKind::Emoji, Some(emoji));

    tracing::info!(board_id = idea.board_id, idea_id, emoji, "Emoji reaction");
    Ok(idea.emoji_reactions)
}

/// Look up the owner and deliver a notice in the background
fn notify_owner(state: &AppState, idea: &Idea, kind: FeedbackKind, emoji: Option<&str>) {
    let state = state.clone();
    let board_id = idea.board_id;
    let idea_id = idea.id;
    let one_liner = idea.one_liner.clone();
    let thumbs_up = idea.thumbs_up;
    let emoji = emoji.map(str::to_string);

    tokio::spawn(async move {
        let board = match state.bounded(state.store.find_board(board_id)).await {
            Ok(Some(board)) => board,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(idea_id, error = ?e, "Owner lookup for notification failed");
                return;
            }
        };
        let notice = FeedbackNotice {
            owner_id: board.owner_id,
            board_id,
            idea_id,
            one_liner,
            kind,
            emoji,
            thumbs_up,
        };
        if let Err(e) = state.notifier.notify(&notice).await {
            tracing::warn!(idea_id, error = %e, "Owner notification failed");
        }
    });
}
