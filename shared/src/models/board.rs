//! Board Model and public projection
//!
//! Boards are managed elsewhere; here they only decide who may edit ideas
//! and what an anonymous visitor may see.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Column, EmojiReaction, Idea, IdeaStatus};
use crate::error::AppError;

/// Idea field a board may expose publicly
///
/// `oneLiner` is always visible and has no entry. `RiceScore` may be stored
/// in a board's settings but the public projection never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibleField {
    Description,
    ValueStatement,
    RiceScore,
    ThumbsUp,
    EmojiReactions,
    InProgress,
    Status,
}

impl VisibleField {
    pub const ALL: [VisibleField; 7] = [
        VisibleField::Description,
        VisibleField::ValueStatement,
        VisibleField::RiceScore,
        VisibleField::ThumbsUp,
        VisibleField::EmojiReactions,
        VisibleField::InProgress,
        VisibleField::Status,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            VisibleField::Description => "description",
            VisibleField::ValueStatement => "valueStatement",
            VisibleField::RiceScore => "riceScore",
            VisibleField::ThumbsUp => "thumbsUp",
            VisibleField::EmojiReactions => "emojiReactions",
            VisibleField::InProgress => "inProgress",
            VisibleField::Status => "status",
        }
    }
}

impl FromStr for VisibleField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisibleField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown field: {}", s)))
    }
}

/// Board entity (read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub visible_columns: Vec<Column>,
    #[serde(default)]
    pub visible_fields: Vec<VisibleField>,
    pub created_at: i64,
}

impl Board {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn shows_column(&self, column: Column) -> bool {
        self.visible_columns.contains(&column)
    }

    pub fn shows_field(&self, field: VisibleField) -> bool {
        self.visible_fields.contains(&field)
    }

    /// Public view of the given ideas: hidden columns dropped, hidden fields
    /// omitted. Input order is preserved.
    pub fn project<'a>(&self, ideas: impl IntoIterator<Item = &'a Idea>) -> Vec<PublicIdea> {
        ideas
            .into_iter()
            .filter(|idea| self.shows_column(idea.column))
            .map(|idea| PublicIdea::project(idea, self))
            .collect()
    }
}

/// Idea as seen by anonymous visitors
///
/// Carries no RICE score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdea {
    pub id: i64,
    pub one_liner: String,
    pub column: Column,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbs_up: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji_reactions: Option<Vec<EmojiReaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IdeaStatus>,
}

impl PublicIdea {
    pub fn project(idea: &Idea, board: &Board) -> Self {
        let show = |field| board.shows_field(field);
        Self {
            id: idea.id,
            one_liner: idea.one_liner.clone(),
            column: idea.column,
            position: idea.position,
            description: show(VisibleField::Description).then(|| idea.description.clone()),
            value_statement: show(VisibleField::ValueStatement)
                .then(|| idea.value_statement.clone()),
            thumbs_up: show(VisibleField::ThumbsUp).then_some(idea.thumbs_up),
            emoji_reactions: show(VisibleField::EmojiReactions)
                .then(|| idea.emoji_reactions.clone()),
            in_progress: show(VisibleField::InProgress).then_some(idea.in_progress),
            status: show(VisibleField::Status).then_some(idea.status),
        }
    }
}
