//! PostgreSQL idea store
//!
//! Conditional writes lock the idea row joined to its board
//! (`SELECT ... FOR UPDATE OF i`) inside a transaction; inserts are a single
//! `INSERT ... SELECT ... WHERE EXISTS` statement.

use async_trait::async_trait;
use shared::models::{Board, Column, EmojiReaction, Idea, IdeaStatus, RiceScore, VisibleField};
use shared::util::now_millis;
use sqlx::PgPool;
use sqlx::types::Json;

use super::{IdeaMutation, IdeaStore, NewIdea, StoreError, StoreResult, WriteOutcome};

const IDEA_COLUMNS: &str = "i.id, i.board_id, i.one_liner, i.description, i.value_statement, \
     i.reach, i.impact, i.confidence, i.effort, i.board_column, i.position, i.in_progress, \
     i.status, i.thumbs_up, i.emoji_reactions, i.created_at, i.updated_at";

#[derive(sqlx::FromRow)]
struct IdeaRow {
    id: i64,
    board_id: i64,
    one_liner: String,
    description: String,
    value_statement: String,
    reach: i32,
    impact: i32,
    confidence: i32,
    effort: i32,
    board_column: String,
    position: i64,
    in_progress: bool,
    status: String,
    thumbs_up: i64,
    emoji_reactions: Json<Vec<EmojiReaction>>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<IdeaRow> for Idea {
    type Error = StoreError;

    fn try_from(row: IdeaRow) -> Result<Self, Self::Error> {
        let column: Column = row
            .board_column
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("idea {}: column {}", row.id, row.board_column)))?;
        let status: IdeaStatus = row
            .status
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("idea {}: status {}", row.id, row.status)))?;
        let position = u32::try_from(row.position)
            .map_err(|_| StoreError::Corrupt(format!("idea {}: position {}", row.id, row.position)))?;
        let thumbs_up = u32::try_from(row.thumbs_up)
            .map_err(|_| StoreError::Corrupt(format!("idea {}: thumbs_up {}", row.id, row.thumbs_up)))?;

        Ok(Idea {
            id: row.id,
            board_id: row.board_id,
            one_liner: row.one_liner,
            description: row.description,
            value_statement: row.value_statement,
            rice_score: RiceScore {
                reach: row.reach,
                impact: row.impact,
                confidence: row.confidence,
                effort: row.effort,
            },
            column,
            position,
            in_progress: row.in_progress,
            status,
            thumbs_up,
            emoji_reactions: row.emoji_reactions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LockedIdeaRow {
    #[sqlx(flatten)]
    idea: IdeaRow,
    owner_id: String,
}

#[derive(sqlx::FromRow)]
struct BoardRow {
    id: i64,
    owner_id: String,
    name: String,
    is_public: bool,
    visible_columns: Vec<String>,
    visible_fields: Vec<String>,
    created_at: i64,
}

impl From<BoardRow> for Board {
    fn from(row: BoardRow) -> Self {
        // Unknown names are dropped so a stale settings entry only hides data
        let visible_columns = row
            .visible_columns
            .iter()
            .filter_map(|c| match c.parse::<Column>() {
                Ok(column) => Some(column),
                Err(_) => {
                    tracing::warn!(board_id = row.id, column = %c, "Ignoring unknown visible column");
                    None
                }
            })
            .collect();
        let visible_fields = row
            .visible_fields
            .iter()
            .filter_map(|f| match f.parse::<VisibleField>() {
                Ok(field) => Some(field),
                Err(_) => {
                    tracing::warn!(board_id = row.id, field = %f, "Ignoring unknown visible field");
                    None
                }
            })
            .collect();

        Board {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            is_public: row.is_public,
            visible_columns,
            visible_fields,
            created_at: row.created_at,
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run pending migrations
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Ok(Self::new(pool))
    }

    /// Distinguish a missing target from a foreign one after a refused write
    async fn refused<T>(&self, exists_sql: &str, id: i64) -> StoreResult<WriteOutcome<T>> {
        let exists: bool = sqlx::query_scalar(exists_sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(if exists {
            WriteOutcome::Forbidden
        } else {
            WriteOutcome::NotFound
        })
    }

    async fn write_back(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        idea: &Idea,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE ideas SET one_liner = $2, description = $3, value_statement = $4,
                reach = $5, impact = $6, confidence = $7, effort = $8,
                board_column = $9, position = $10, in_progress = $11, status = $12,
                thumbs_up = $13, emoji_reactions = $14, updated_at = $15
             WHERE id = $1",
        )
        .bind(idea.id)
        .bind(&idea.one_liner)
        .bind(&idea.description)
        .bind(&idea.value_statement)
        .bind(idea.rice_score.reach)
        .bind(idea.rice_score.impact)
        .bind(idea.rice_score.confidence)
        .bind(idea.rice_score.effort)
        .bind(idea.column.as_str())
        .bind(i64::from(idea.position))
        .bind(idea.in_progress)
        .bind(idea.status.as_str())
        .bind(i64::from(idea.thumbs_up))
        .bind(Json(&idea.emoji_reactions))
        .bind(idea.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl IdeaStore for PgStore {
    async fn find_board(&self, board_id: i64) -> StoreResult<Option<Board>> {
        let row: Option<BoardRow> = sqlx::query_as(
            "SELECT id, owner_id, name, is_public, visible_columns, visible_fields, created_at
             FROM boards WHERE id = $1",
        )
        .bind(board_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Board::from))
    }

    async fn find_idea(&self, id: i64) -> StoreResult<Option<Idea>> {
        let row: Option<IdeaRow> =
            sqlx::query_as(&format!("SELECT {IDEA_COLUMNS} FROM ideas i WHERE i.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Idea::try_from).transpose()
    }

    async fn list_ideas(&self, board_id: i64) -> StoreResult<Vec<Idea>> {
        let rows: Vec<IdeaRow> = sqlx::query_as(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas i WHERE i.board_id = $1
             ORDER BY i.position, i.created_at, i.id"
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Idea::try_from).collect()
    }

    async fn insert_appended(
        &self,
        owner_id: &str,
        idea: NewIdea,
    ) -> StoreResult<WriteOutcome<Idea>> {
        let row: Option<IdeaRow> = sqlx::query_as(
            "INSERT INTO ideas AS i (id, board_id, one_liner, description, value_statement,
                reach, impact, confidence, effort, board_column, position,
                in_progress, status, thumbs_up, emoji_reactions, created_at, updated_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                COALESCE((SELECT MAX(position) FROM ideas WHERE board_id = $2 AND board_column = $10), 0) + 1,
                FALSE, 'active', 0, '[]'::jsonb, $11, $11
             WHERE EXISTS (SELECT 1 FROM boards WHERE id = $2 AND owner_id = $12)
             RETURNING i.*",
        )
        .bind(idea.id)
        .bind(idea.board_id)
        .bind(&idea.one_liner)
        .bind(&idea.description)
        .bind(&idea.value_statement)
        .bind(idea.rice_score.reach)
        .bind(idea.rice_score.impact)
        .bind(idea.rice_score.confidence)
        .bind(idea.rice_score.effort)
        .bind(idea.column.as_str())
        .bind(idea.created_at)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e
                && db.is_unique_violation()
            {
                return StoreError::DuplicateId(idea.id);
            }
            StoreError::Database(e)
        })?;

        match row {
            Some(row) => Ok(WriteOutcome::Applied(Idea::try_from(row)?)),
            None => {
                self.refused("SELECT EXISTS (SELECT 1 FROM boards WHERE id = $1)", idea.board_id)
                    .await
            }
        }
    }

    async fn update_owned(
        &self,
        id: i64,
        owner_id: &str,
        mutation: IdeaMutation,
    ) -> StoreResult<WriteOutcome<Idea>> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<LockedIdeaRow> = sqlx::query_as(&format!(
            "SELECT {IDEA_COLUMNS}, b.owner_id FROM ideas i
             JOIN boards b ON b.id = i.board_id
             WHERE i.id = $1
             FOR UPDATE OF i"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(locked) = locked else {
            return Ok(WriteOutcome::NotFound);
        };
        if locked.owner_id != owner_id {
            return Ok(WriteOutcome::Forbidden);
        }

        let mut idea = Idea::try_from(locked.idea)?;
        mutation(&mut idea);
        idea.updated_at = now_millis();

        Self::write_back(&mut tx, &idea).await?;
        tx.commit().await?;
        Ok(WriteOutcome::Applied(idea))
    }

    async fn delete_owned(&self, id: i64, owner_id: &str) -> StoreResult<WriteOutcome<i64>> {
        let deleted: Option<i64> = sqlx::query_scalar(
            "DELETE FROM ideas i USING boards b
             WHERE i.id = $1 AND b.id = i.board_id AND b.owner_id = $2
             RETURNING i.board_id",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        match deleted {
            Some(board_id) => Ok(WriteOutcome::Applied(board_id)),
            None => {
                self.refused("SELECT EXISTS (SELECT 1 FROM ideas WHERE id = $1)", id)
                    .await
            }
        }
    }

    async fn increment_thumbs_up(&self, id: i64) -> StoreResult<Option<Idea>> {
        let row: Option<IdeaRow> = sqlx::query_as(
            "UPDATE ideas AS i SET thumbs_up = i.thumbs_up + 1, updated_at = $2
             WHERE i.id = $1
             RETURNING i.*",
        )
        .bind(id)
        .bind(now_millis())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Idea::try_from).transpose()
    }

    async fn increment_emoji(&self, id: i64, emoji: &str) -> StoreResult<Option<Idea>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<IdeaRow> = sqlx::query_as(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas i WHERE i.id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut idea = Idea::try_from(row)?;
        idea.add_emoji(emoji);
        idea.updated_at = now_millis();

        Self::write_back(&mut tx, &idea).await?;
        tx.commit().await?;
        Ok(Some(idea))
    }
}
