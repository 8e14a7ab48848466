//! In-memory idea store

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{Board, Idea};
use shared::util::now_millis;
use std::collections::HashMap;

use super::{IdeaMutation, IdeaStore, NewIdea, StoreError, StoreResult, WriteOutcome};

#[derive(Default)]
struct Tables {
    boards: HashMap<i64, Board>,
    ideas: HashMap<i64, Idea>,
}

impl Tables {
    fn owns(&self, board_id: i64, owner_id: &str) -> Option<bool> {
        self.boards.get(&board_id).map(|b| b.is_owned_by(owner_id))
    }
}

/// Every operation runs under one lock, so conditional writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board CRUD is external; this seeds one
    pub fn insert_board(&self, board: Board) {
        self.tables.lock().boards.insert(board.id, board);
    }

    /// Seed an idea verbatim (tests and fixtures)
    pub fn insert_idea(&self, idea: Idea) {
        self.tables.lock().ideas.insert(idea.id, idea);
    }
}

#[async_trait]
impl IdeaStore for MemoryStore {
    async fn find_board(&self, board_id: i64) -> StoreResult<Option<Board>> {
        Ok(self.tables.lock().boards.get(&board_id).cloned())
    }

    async fn find_idea(&self, id: i64) -> StoreResult<Option<Idea>> {
        Ok(self.tables.lock().ideas.get(&id).cloned())
    }

    async fn list_ideas(&self, board_id: i64) -> StoreResult<Vec<Idea>> {
        Ok(self
            .tables
            .lock()
            .ideas
            .values()
            .filter(|i| i.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn insert_appended(
        &self,
        owner_id: &str,
        idea: NewIdea,
    ) -> StoreResult<WriteOutcome<Idea>> {
        let mut tables = self.tables.lock();
        match tables.owns(idea.board_id, owner_id) {
            None => return Ok(WriteOutcome::NotFound),
            Some(false) => return Ok(WriteOutcome::Forbidden),
            Some(true) => {}
        }
        if tables.ideas.contains_key(&idea.id) {
            return Err(StoreError::DuplicateId(idea.id));
        }

        let max = tables
            .ideas
            .values()
            .filter(|i| i.board_id == idea.board_id && i.column == idea.column)
            .map(|i| i.position)
            .max()
            .unwrap_or(0);

        let idea = idea.into_idea(max.saturating_add(1));
        tables.ideas.insert(idea.id, idea.clone());
        Ok(WriteOutcome::Applied(idea))
    }

    async fn update_owned(
        &self,
        id: i64,
        owner_id: &str,
        mutation: IdeaMutation,
    ) -> StoreResult<WriteOutcome<Idea>> {
        let mut tables = self.tables.lock();
        let Some(board_id) = tables.ideas.get(&id).map(|i| i.board_id) else {
            return Ok(WriteOutcome::NotFound);
        };
        if tables.owns(board_id, owner_id) != Some(true) {
            return Ok(WriteOutcome::Forbidden);
        }

        let Some(idea) = tables.ideas.get_mut(&id) else {
            return Ok(WriteOutcome::NotFound);
        };
        mutation(idea);
        idea.updated_at = now_millis();
        Ok(WriteOutcome::Applied(idea.clone()))
    }

    async fn delete_owned(&self, id: i64, owner_id: &str) -> StoreResult<WriteOutcome<i64>> {
        let mut tables = self.tables.lock();
        let Some(board_id) = tables.ideas.get(&id).map(|i| i.board_id) else {
            return Ok(WriteOutcome::NotFound);
        };
        if tables.owns(board_id, owner_id) != Some(true) {
            return Ok(WriteOutcome::Forbidden);
        }
        tables.ideas.remove(&id);
        Ok(WriteOutcome::Applied(board_id))
    }

    async fn increment_thumbs_up(&self, id: i64) -> StoreResult<Option<Idea>> {
        let mut tables = self.tables.lock();
        Ok(tables.ideas.get_mut(&id).map(|idea| {
            idea.thumbs_up = idea.thumbs_up.saturating_add(1);
            idea.updated_at = now_millis();
            idea.clone()
        }))
    }

    async fn increment_emoji(&self, id: i64, emoji: &str) -> StoreResult<Option<Idea>> {
        let mut tables = self.tables.lock();
        Ok(tables.ideas.get_mut(&id).map(|idea| {
            idea.add_emoji(emoji);
            idea.updated_at = now_millis();
            idea.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Column, RiceScore};

    fn board(id: i64, owner: &str) -> Board {
        Board {
            id,
            owner_id: owner.to_string(),
            name: "Roadmap".to_string(),
            is_public: false,
            visible_columns: vec![],
            visible_fields: vec![],
            created_at: 0,
        }
    }

    fn draft(id: i64, board_id: i64, column: Column) -> NewIdea {
        NewIdea {
            id,
            board_id,
            one_liner: format!("idea {}", id),
            description: String::new(),
            value_statement: String::new(),
            rice_score: RiceScore::default(),
            column,
            created_at: id,
        }
    }

    fn applied<T>(outcome: WriteOutcome<T>) -> T {
        match outcome {
            WriteOutcome::Applied(v) => v,
            _ => panic!("write was not applied"),
        }
    }

    #[tokio::test]
    async fn insert_appends_per_column() {
        let store = MemoryStore::new();
        store.insert_board(board(1, "alice"));

        let a = applied(store.insert_appended("alice", draft(10, 1, Column::Parking)).await.unwrap());
        let b = applied(store.insert_appended("alice", draft(11, 1, Column::Parking)).await.unwrap());
        let c = applied(store.insert_appended("alice", draft(12, 1, Column::Now)).await.unwrap());

        assert_eq!(a.position, 1);
        assert_eq!(b.position, 2);
        assert_eq!(c.position, 1);
    }

    #[tokio::test]
    async fn insert_never_replaces_an_existing_id() {
        let store = MemoryStore::new();
        store.insert_board(board(1, "alice"));

        let mut first = draft(42, 1, Column::Parking);
        first.one_liner = "first".into();
        let mut second = draft(42, 1, Column::Now);
        second.one_liner = "second".into();

        applied(store.insert_appended("alice", first).await.unwrap());
        let err = store.insert_appended("alice", second).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(42)));

        let ideas = store.list_ideas(1).await.unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].one_liner, "first");
        assert_eq!(ideas[0].column, Column::Parking);
    }

    #[tokio::test]
    async fn insert_checks_board_ownership() {
        let store = MemoryStore::new();
        store.insert_board(board(1, "alice"));

        let outcome = store.insert_appended("mallory", draft(10, 1, Column::Parking)).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Forbidden);

        let outcome = store.insert_appended("alice", draft(10, 99, Column::Parking)).await.unwrap();
        assert_eq!(outcome, WriteOutcome::NotFound);
    }

    #[tokio::test]
    async fn update_and_delete_are_owner_only() {
        let store = MemoryStore::new();
        store.insert_board(board(1, "alice"));
        applied(store.insert_appended("alice", draft(10, 1, Column::Parking)).await.unwrap());

        let outcome = store
            .update_owned(10, "mallory", Box::new(|i: &mut Idea| i.one_liner = "hijacked".into()))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Forbidden);
        assert_eq!(store.find_idea(10).await.unwrap().unwrap().one_liner, "idea 10");

        assert_eq!(store.delete_owned(10, "mallory").await.unwrap(), WriteOutcome::Forbidden);
        assert_eq!(store.delete_owned(10, "alice").await.unwrap(), WriteOutcome::Applied(1));
        assert_eq!(store.delete_owned(10, "alice").await.unwrap(), WriteOutcome::NotFound);
    }

    #[tokio::test]
    async fn counters_increment_in_place() {
        let store = MemoryStore::new();
        store.insert_board(board(1, "alice"));
        applied(store.insert_appended("alice", draft(10, 1, Column::Parking)).await.unwrap());

        store.increment_thumbs_up(10).await.unwrap();
        let idea = store.increment_thumbs_up(10).await.unwrap().unwrap();
        assert_eq!(idea.thumbs_up, 2);

        store.increment_emoji(10, "🎉").await.unwrap();
        let idea = store.increment_emoji(10, "🎉").await.unwrap().unwrap();
        assert_eq!(idea.emoji_reactions.len(), 1);
        assert_eq!(idea.emoji_reactions[0].count, 2);

        assert!(store.increment_thumbs_up(404).await.unwrap().is_none());
    }
}
