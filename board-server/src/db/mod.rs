//! Idea persistence
//!
//! [`IdeaStore`] is the seam between the engines and storage. Writes that
//! require board ownership are conditional: the ownership check and the
//! mutation happen as one store operation, so a board changing hands between
//! check and write cannot slip through.
//!
//! Backends:
//! - [`MemoryStore`]: single mutex, used in tests and when no database is configured
//! - [`PgStore`]: PostgreSQL via sqlx, row locks inside a transaction

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use shared::models::{Board, Column, Idea, RiceScore};
use thiserror::Error;

/// Storage failure (never a business-rule violation)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back onto the domain model
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// Insert refused because an idea with this id already exists
    #[error("idea id {0} already taken")]
    DuplicateId(i64),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a write guarded by board ownership
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T> {
    Applied(T),
    /// Target idea (or board, for inserts) does not exist
    NotFound,
    /// Target exists but the caller does not own its board
    Forbidden,
}

/// In-place mutation applied under the store's lock
pub type IdeaMutation = Box<dyn FnOnce(&mut Idea) + Send>;

/// Fields of an idea about to be created; the store picks the position
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub id: i64,
    pub board_id: i64,
    pub one_liner: String,
    pub description: String,
    pub value_statement: String,
    pub rice_score: RiceScore,
    pub column: Column,
    pub created_at: i64,
}

impl NewIdea {
    /// Materialize at `position` with fresh counters
    pub fn into_idea(self, position: u32) -> Idea {
        Idea {
            id: self.id,
            board_id: self.board_id,
            one_liner: self.one_liner,
            description: self.description,
            value_statement: self.value_statement,
            rice_score: self.rice_score,
            column: self.column,
            position,
            in_progress: false,
            status: Default::default(),
            thumbs_up: 0,
            emoji_reactions: Vec::new(),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn find_board(&self, board_id: i64) -> StoreResult<Option<Board>>;

    async fn find_idea(&self, id: i64) -> StoreResult<Option<Idea>>;

    /// All ideas of a board, in no particular order
    async fn list_ideas(&self, board_id: i64) -> StoreResult<Vec<Idea>>;

    /// Insert at one past the current maximum position of the target column
    /// (1 for an empty column), if `owner_id` owns the board.
    /// An existing idea with the same id is never replaced: the insert fails
    /// with [`StoreError::DuplicateId`].
    async fn insert_appended(&self, owner_id: &str, idea: NewIdea)
    -> StoreResult<WriteOutcome<Idea>>;

    /// Apply `mutation` to idea `id` if `owner_id` owns its board.
    /// `updated_at` is stamped by the store.
    async fn update_owned(
        &self,
        id: i64,
        owner_id: &str,
        mutation: IdeaMutation,
    ) -> StoreResult<WriteOutcome<Idea>>;

    /// Delete idea `id` if `owner_id` owns its board; yields the board id
    async fn delete_owned(&self, id: i64, owner_id: &str) -> StoreResult<WriteOutcome<i64>>;

    /// Atomically add one thumbs-up; `None` if the idea does not exist
    async fn increment_thumbs_up(&self, id: i64) -> StoreResult<Option<Idea>>;

    /// Atomically bump (or append) the emoji counter; `None` if the idea does not exist
    async fn increment_emoji(&self, id: i64, emoji: &str) -> StoreResult<Option<Idea>>;
}
