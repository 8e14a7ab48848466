//! Idea operations
//!
//! Every owner-only write goes through a single conditional store call
//! (`insert_appended` / `update_owned` / `delete_owned`). Moves and status
//! changes are published to the board's live connections after the write.

use shared::live::{IdeaEvent, LiveMessage};
use shared::models::{
    Column, Idea, IdeaCreate, IdeaStatus, IdeaUpdate, PositionUpdate, PublicIdea, StatusUpdate,
};
use shared::util::{now_millis, snowflake_id};
use shared::AppError;

use super::position::{self, Move};
use super::transition::{self, StatusChange};
use crate::auth::CurrentUser;
use crate::db::{NewIdea, StoreError, WriteOutcome};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Fresh ids drawn before an id collision is reported as a storage error
const ID_ATTEMPTS: usize = 3;

fn owned<T>(outcome: WriteOutcome<T>, idea_id: i64) -> ServiceResult<T> {
    match outcome {
        WriteOutcome::Applied(value) => Ok(value),
        WriteOutcome::NotFound => Err(AppError::idea_not_found(idea_id).into()),
        WriteOutcome::Forbidden => Err(AppError::permission_denied(
            "Only the board owner can change this idea",
        )
        .with_detail("ideaId", idea_id)
        .into()),
    }
}

/// createIdea: appended to the end of its column (default `parking`)
pub async fn create_idea(
    state: &AppState,
    user: &CurrentUser,
    board_id: i64,
    payload: IdeaCreate,
) -> ServiceResult<Idea> {
    payload.validate()?;
    let column = match payload.column.as_deref() {
        Some(raw) => raw.parse::<Column>()?,
        None => Column::Parking,
    };

    let draft = NewIdea {
        id: snowflake_id(),
        board_id,
        one_liner: payload.one_liner.trim().to_string(),
        description: payload.description.unwrap_or_default(),
        value_statement: payload.value_statement.unwrap_or_default(),
        rice_score: payload.rice_score.unwrap_or_default(),
        column,
        created_at: now_millis(),
    };

    let store = &state.store;
    let inserted = state.bounded(async {
        let mut draft = draft;
        for _ in 1..ID_ATTEMPTS {
            match store.insert_appended(&user.id, draft.clone()).await {
                Err(StoreError::DuplicateId(taken)) => {
                    tracing::warn!(board_id, idea_id = taken, "Idea id collision, drawing a new one");
                    draft.id = snowflake_id();
                }
                other => return other,
            }
        }
        store.insert_appended(&user.id, draft).await
    });

    let idea = match inserted.await? {
        WriteOutcome::Applied(idea) => idea,
        WriteOutcome::NotFound => return Err(AppError::board_not_found(board_id).into()),
        WriteOutcome::Forbidden => {
            return Err(AppError::permission_denied("Only the board owner can add ideas")
                .with_detail("boardId", board_id)
                .into());
        }
    };

    tracing::info!(board_id, idea_id = idea.id, column = %idea.column, position = idea.position, "Idea created");
    Ok(idea)
}

/// listIdeas: full ideas of an owned board in display order
pub async fn list_ideas(
    state: &AppState,
    user: &CurrentUser,
    board_id: i64,
) -> ServiceResult<Vec<Idea>> {
    let board = state
        .bounded(state.store.find_board(board_id))
        .await?
        .ok_or_else(|| AppError::board_not_found(board_id))?;
    if !board.is_owned_by(&user.id) {
        return Err(AppError::permission_denied("Only the board owner can list ideas")
            .with_detail("boardId", board_id)
            .into());
    }

    let mut ideas = state.bounded(state.store.list_ideas(board_id)).await?;
    position::sort_ideas(&mut ideas);
    Ok(ideas)
}

/// updateIdeaFields: text and RICE edits; column, status and counters untouched
pub async fn update_idea_fields(
    state: &AppState,
    user: &CurrentUser,
    idea_id: i64,
    payload: IdeaUpdate,
) -> ServiceResult<Idea> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(AppError::validation("Nothing to update").into());
    }

    let outcome = state
        .bounded(state.store.update_owned(
            idea_id,
            &user.id,
            Box::new(move |idea: &mut Idea| idea.apply_update(&payload)),
        ))
        .await?;
    let idea = owned(outcome, idea_id)?;

    tracing::info!(board_id = idea.board_id, idea_id, "Idea updated");
    Ok(idea)
}

/// updateIdeaPosition: drag and drop; emits `position_update`
pub async fn update_idea_position(
    state: &AppState,
    user: &CurrentUser,
    idea_id: i64,
    payload: PositionUpdate,
    origin: Option<String>,
) -> ServiceResult<Idea> {
    let target = Move::parse(&payload.column, payload.position)?;

    let outcome = state
        .bounded(state.store.update_owned(
            idea_id,
            &user.id,
            Box::new(move |idea: &mut Idea| position::apply_move(idea, target)),
        ))
        .await?;
    let idea = owned(outcome, idea_id)?;

    let reached = state.hub.publish(
        idea.board_id,
        LiveMessage::PositionUpdate(IdeaEvent::from_idea(&idea, origin)),
    );
    tracing::info!(
        board_id = idea.board_id,
        idea_id,
        column = %idea.column,
        position = idea.position,
        reached,
        "Idea moved"
    );
    Ok(idea)
}

/// Parse the raw status request at the boundary
pub fn parse_status_change(payload: &StatusUpdate) -> Result<StatusChange, AppError> {
    let change = StatusChange {
        status: payload
            .status
            .as_deref()
            .map(str::parse::<IdeaStatus>)
            .transpose()?,
        column: payload
            .column
            .as_deref()
            .map(str::parse::<Column>)
            .transpose()?,
        in_progress: payload.in_progress,
    };
    if change.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }
    Ok(change)
}

/// updateIdeaStatus: runs the transition engine; emits `status_update`
pub async fn update_idea_status(
    state: &AppState,
    user: &CurrentUser,
    idea_id: i64,
    payload: StatusUpdate,
    origin: Option<String>,
) -> ServiceResult<Idea> {
    let change = parse_status_change(&payload)?;

    let outcome = state
        .bounded(state.store.update_owned(
            idea_id,
            &user.id,
            Box::new(move |idea: &mut Idea| transition::apply_status_change(idea, change)),
        ))
        .await?;
    let idea = owned(outcome, idea_id)?;

    let reached = state.hub.publish(
        idea.board_id,
        LiveMessage::StatusUpdate(IdeaEvent::from_idea(&idea, origin)),
    );
    tracing::info!(
        board_id = idea.board_id,
        idea_id,
        status = %idea.status,
        column = %idea.column,
        in_progress = idea.in_progress,
        reached,
        "Idea status changed"
    );
    Ok(idea)
}

/// deleteIdea
pub async fn delete_idea(state: &AppState, user: &CurrentUser, idea_id: i64) -> ServiceResult<()> {
    let outcome = state
        .bounded(state.store.delete_owned(idea_id, &user.id))
        .await?;
    let board_id = owned(outcome, idea_id)?;
    tracing::info!(board_id, idea_id, "Idea deleted");
    Ok(())
}

/// Public read: visible columns and fields of a public board only
pub async fn list_public_ideas(state: &AppState, board_id: i64) -> ServiceResult<Vec<PublicIdea>> {
    let board = state
        .bounded(state.store.find_board(board_id))
        .await?
        .filter(|b| b.is_public)
        .ok_or_else(|| AppError::board_not_found(board_id))?;

    let mut ideas = state.bounded(state.store.list_ideas(board_id)).await?;
    position::sort_ideas(&mut ideas);
    Ok(board.project(&ideas))
}
