//! Per-connection filtering of the board stream
//!
//! The hub publishes one unfiltered stream per board. Owners receive it
//! as is; every other viewer gets the public projection, the same columns
//! and fields the public idea list exposes.

use shared::live::{IdeaRef, LiveMessage};
use shared::models::{Board, Idea};
use std::collections::HashSet;

/// What one live connection may receive
pub enum LiveViewer {
    Owner,
    /// Anonymous (or non-owner) visitor of a public board
    Public(PublicFeed),
}

impl LiveViewer {
    /// `None` when the message must not reach this connection
    pub fn filter(&mut self, message: LiveMessage) -> Option<LiveMessage> {
        match self {
            LiveViewer::Owner => Some(message),
            LiveViewer::Public(feed) => feed.filter(&message),
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, LiveViewer::Owner)
    }
}

/// Public projection of a board stream
///
/// Board settings are read once, when the connection opens.
pub struct PublicFeed {
    board: Board,
    /// Ideas the visitor currently sees in a visible column
    shown: HashSet<i64>,
}

impl PublicFeed {
    pub fn new(board: Board, ideas: &[Idea]) -> Self {
        let shown = ideas
            .iter()
            .filter(|i| board.shows_column(i.column))
            .map(|i| i.id)
            .collect();
        Self { board, shown }
    }

    /// Project `message`; an idea moving out of view becomes a bare
    /// `idea_hidden` so the visitor drops it without learning where it went.
    pub fn filter(&mut self, message: &LiveMessage) -> Option<LiveMessage> {
        let projected = message.project(&self.board);
        if message.is_structural()
            && let Some(idea_id) = message.idea_id()
        {
            if projected.is_some() {
                self.shown.insert(idea_id);
            } else if self.shown.remove(&idea_id) {
                return Some(LiveMessage::IdeaHidden(IdeaRef { idea_id }));
            }
        }
        projected
    }
}
