//! Live board WebSocket protocol
//!
//! Server → Client: [`LiveMessage`] (`{"type": ..., "data": ...}`)
//! Client → Server: [`LiveCommand`] (`{"type": "ping"}`)

use serde::{Deserialize, Serialize};

use crate::models::{Board, Column, EmojiReaction, Idea, IdeaStatus, VisibleField};

/// Server → Client push
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Idea moved (column and/or position)
    PositionUpdate(IdeaEvent),
    /// Idea status, in-progress flag or column changed via status operation
    StatusUpdate(IdeaEvent),
    /// Public reaction landed; clients patch counters without reloading
    FeedbackAnimation(FeedbackEvent),
    /// Idea left the public view (moved into a hidden column)
    IdeaHidden(IdeaRef),
    /// Reply to [`LiveCommand::Ping`]
    Pong,
}

impl LiveMessage {
    /// Idea the message refers to, if any
    pub fn idea_id(&self) -> Option<i64> {
        match self {
            LiveMessage::PositionUpdate(e) | LiveMessage::StatusUpdate(e) => Some(e.idea_id),
            LiveMessage::FeedbackAnimation(e) => Some(e.idea_id),
            LiveMessage::IdeaHidden(r) => Some(r.idea_id),
            LiveMessage::Pong => None,
        }
    }

    /// Structural updates invalidate a client's board view
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LiveMessage::PositionUpdate(_)
                | LiveMessage::StatusUpdate(_)
                | LiveMessage::IdeaHidden(_)
        )
    }

    /// Column the idea sits in after the change
    pub fn column(&self) -> Option<Column> {
        match self {
            LiveMessage::PositionUpdate(e) | LiveMessage::StatusUpdate(e) => Some(e.column),
            LiveMessage::FeedbackAnimation(e) => Some(e.column),
            LiveMessage::IdeaHidden(_) | LiveMessage::Pong => None,
        }
    }

    /// The message as an anonymous visitor of `board` may see it
    ///
    /// `None` when the idea sits in a hidden column. Otherwise fields the
    /// board does not expose are stripped and the origin is dropped.
    pub fn project(&self, board: &Board) -> Option<LiveMessage> {
        if let Some(column) = self.column()
            && !board.shows_column(column)
        {
            return None;
        }
        let show = |field| board.shows_field(field);
        let projected = match self {
            LiveMessage::PositionUpdate(e) => LiveMessage::PositionUpdate(e.redacted(board)),
            LiveMessage::StatusUpdate(e) => LiveMessage::StatusUpdate(e.redacted(board)),
            LiveMessage::FeedbackAnimation(e) => LiveMessage::FeedbackAnimation(FeedbackEvent {
                idea_id: e.idea_id,
                column: e.column,
                animation: e.animation,
                emoji: e.emoji.clone().filter(|_| show(VisibleField::EmojiReactions)),
                thumbs_up: e.thumbs_up.filter(|_| show(VisibleField::ThumbsUp)),
                emoji_reactions: e
                    .emoji_reactions
                    .clone()
                    .filter(|_| show(VisibleField::EmojiReactions)),
            }),
            other => other.clone(),
        };
        Some(projected)
    }
}

/// Client → Server command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveCommand {
    Ping,
}

/// Payload of `position_update` / `status_update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaEvent {
    pub idea_id: i64,
    pub board_id: i64,
    pub column: Column,
    pub position: u32,
    /// Absent for public viewers when the board hides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IdeaStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,
    /// Client id of the request that caused the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl IdeaEvent {
    pub fn from_idea(idea: &Idea, origin: Option<String>) -> Self {
        Self {
            idea_id: idea.id,
            board_id: idea.board_id,
            column: idea.column,
            position: idea.position,
            status: Some(idea.status),
            in_progress: Some(idea.in_progress),
            origin,
        }
    }

    fn redacted(&self, board: &Board) -> Self {
        Self {
            idea_id: self.idea_id,
            board_id: self.board_id,
            column: self.column,
            position: self.position,
            status: self.status.filter(|_| board.shows_field(VisibleField::Status)),
            in_progress: self
                .in_progress
                .filter(|_| board.shows_field(VisibleField::InProgress)),
            origin: None,
        }
    }
}

/// Payload of `idea_hidden`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRef {
    pub idea_id: i64,
}

/// Which animation a feedback event plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Thumbsup,
    Emoji,
}

/// Payload of `feedback_animation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEvent {
    pub idea_id: i64,
    pub column: Column,
    pub animation: FeedbackKind,
    /// Glyph for emoji animations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Counters are absent for public viewers when the board hides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbs_up: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_reactions: Option<Vec<EmojiReaction>>,
}

impl FeedbackEvent {
    pub fn thumbs_up(idea: &Idea) -> Self {
        Self {
            idea_id: idea.id,
            column: idea.column,
            animation: FeedbackKind::Thumbsup,
            emoji: None,
            thumbs_up: Some(idea.thumbs_up),
            emoji_reactions: Some(idea.emoji_reactions.clone()),
        }
    }

    pub fn emoji(idea: &Idea, emoji: impl Into<String>) -> Self {
        Self {
            idea_id: idea.id,
            column: idea.column,
            animation: FeedbackKind::Emoji,
            emoji: Some(emoji.into()),
            thumbs_up: Some(idea.thumbs_up),
            emoji_reactions: Some(idea.emoji_reactions.clone()),
        }
    }
}
