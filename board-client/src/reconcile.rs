//! Client-side board reconciliation
//!
//! The server is authoritative. Structural changes (moves, status changes)
//! are never patched locally: the view reloads the whole board. Feedback
//! counters are the exception and are patched in place. The echo of a drop
//! this view persisted itself is skipped, since the drop already reloaded.
//! Messages missed while the live channel was down are recovered by a
//! reload once it reconnects.

use shared::live::{FeedbackEvent, LiveMessage};
use shared::models::{Column, Idea, append_position};

use crate::drag::DropIntent;
use crate::http::BoardApi;
use crate::reconnect::ConnectionState;
use crate::ClientResult;

/// User-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// What a live message did to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEffect {
    /// Full authoritative reload
    Reloaded,
    /// Counters patched, animation queued
    Patched,
    /// Echo of this view's own drop, keepalive, or unknown idea
    Ignored,
}

pub struct BoardView<A: BoardApi> {
    api: A,
    board_id: i64,
    client_id: String,
    ideas: Vec<Idea>,
    notices: Vec<Notice>,
    animations: Vec<FeedbackEvent>,
    /// Ideas dropped here whose `position_update` echo is still due
    pending_drops: Vec<i64>,
    live_up: bool,
    /// Live channel dropped since it was last connected
    live_gap: bool,
}

impl<A: BoardApi> BoardView<A> {
    /// `client_id` must match the `X-Client-Id` the API client sends
    pub fn new(api: A, board_id: i64, client_id: impl Into<String>) -> Self {
        Self {
            api,
            board_id,
            client_id: client_id.into(),
            ideas: Vec::new(),
            notices: Vec::new(),
            animations: Vec::new(),
            pending_drops: Vec::new(),
            live_up: false,
            live_gap: false,
        }
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    /// Ideas of one column in display order
    pub fn column(&self, column: Column) -> impl Iterator<Item = &Idea> {
        self.ideas.iter().filter(move |i| i.column == column)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Pending feedback animations, oldest first
    pub fn take_animations(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.animations)
    }

    /// Replace local state with the server's
    pub async fn reload(&mut self) -> ClientResult<()> {
        self.ideas = self.api.list_ideas(self.board_id).await?;
        tracing::debug!(board_id = self.board_id, ideas = self.ideas.len(), "Board reloaded");
        Ok(())
    }

    /// Persist a drop: append to the target column, notify, then reload
    pub async fn drop_idea(&mut self, intent: DropIntent) -> ClientResult<()> {
        let position = append_position(&self.ideas, intent.to);

        if let Err(e) = self.api.move_idea(intent.idea_id, intent.to, position).await {
            self.notices.push(Notice::Error(format!("Could not move idea: {e}")));
            self.reload().await?;
            return Err(e);
        }
        self.pending_drops.push(intent.idea_id);

        self.notices
            .push(Notice::Success(format!("Moved to {}", intent.to)));
        self.reload().await
    }

    /// Apply one message from the live channel
    pub async fn apply_live(&mut self, message: LiveMessage) -> ClientResult<LiveEffect> {
        match message {
            LiveMessage::PositionUpdate(event) => {
                if event.origin.as_deref() == Some(self.client_id.as_str())
                    && let Some(i) = self.pending_drops.iter().position(|id| *id == event.idea_id)
                {
                    self.pending_drops.swap_remove(i);
                    return Ok(LiveEffect::Ignored);
                }
                self.reload().await?;
                Ok(LiveEffect::Reloaded)
            }
            LiveMessage::StatusUpdate(_) | LiveMessage::IdeaHidden(_) => {
                self.reload().await?;
                Ok(LiveEffect::Reloaded)
            }
            LiveMessage::FeedbackAnimation(event) => {
                let Some(idea) = self.ideas.iter_mut().find(|i| i.id == event.idea_id) else {
                    return Ok(LiveEffect::Ignored);
                };
                if let Some(thumbs_up) = event.thumbs_up {
                    idea.thumbs_up = thumbs_up;
                }
                if let Some(reactions) = &event.emoji_reactions {
                    idea.emoji_reactions = reactions.clone();
                }
                self.animations.push(event);
                Ok(LiveEffect::Patched)
            }
            LiveMessage::Pong => Ok(LiveEffect::Ignored),
        }
    }

    /// Feed live connection state changes; returns whether the view reloaded
    ///
    /// The first `Connected` after the channel dropped reloads the board,
    /// since anything published in between was never delivered.
    pub async fn on_connection_state(&mut self, state: ConnectionState) -> ClientResult<bool> {
        if state != ConnectionState::Connected {
            if self.live_up {
                self.live_up = false;
                self.live_gap = true;
            }
            return Ok(false);
        }

        self.live_up = true;
        if !std::mem::take(&mut self.live_gap) {
            return Ok(false);
        }
        // Echoes sent during the gap are lost
        self.pending_drops.clear();
        if let Err(e) = self.reload().await {
            self.live_gap = true;
            return Err(e);
        }
        tracing::info!(board_id = self.board_id, "Board resynced after live reconnect");
        Ok(true)
    }
}
