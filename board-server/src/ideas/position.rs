//! Per-column ordering
//!
//! Positions are caller-supplied ordering keys. They are never renumbered,
//! duplicates are allowed, and ties fall back to creation time then id.

use shared::AppError;
use shared::models::{Column, Idea};
use std::cmp::Ordering;

/// Validated move target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub column: Column,
    pub position: u32,
}

impl Move {
    /// Parse a raw `(column, position)` pair from a request
    pub fn parse(column: &str, position: i64) -> Result<Self, AppError> {
        let column: Column = column.parse()?;
        if position < 0 {
            return Err(AppError::validation("Position must not be negative")
                .with_detail("field", "position")
                .with_detail("value", position));
        }
        let position = u32::try_from(position).map_err(|_| {
            AppError::validation("Position is too large")
                .with_detail("field", "position")
                .with_detail("value", position)
        })?;
        Ok(Self { column, position })
    }
}

/// Move `idea` to the target column and position; nothing else is touched
pub fn apply_move(idea: &mut Idea, target: Move) {
    idea.column = target.column;
    idea.position = target.position;
    if target.column == Column::Parking {
        idea.in_progress = false;
    }
}

/// Board display order: column, position, creation time, id
pub fn board_order(a: &Idea, b: &Idea) -> Ordering {
    a.column
        .cmp(&b.column)
        .then(a.position.cmp(&b.position))
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

pub fn sort_ideas(ideas: &mut [Idea]) {
    ideas.sort_by(board_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;
    use shared::models::IdeaStatus;

    fn idea(id: i64, column: Column, position: u32, created_at: i64) -> Idea {
        Idea {
            id,
            board_id: 1,
            one_liner: format!("idea {}", id),
            description: String::new(),
            value_statement: String::new(),
            rice_score: Default::default(),
            column,
            position,
            in_progress: false,
            status: IdeaStatus::Active,
            thumbs_up: 0,
            emoji_reactions: vec![],
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn sorts_by_column_then_position_then_age() {
        let mut ideas = vec![
            idea(1, Column::WontDo, 1, 10),
            idea(2, Column::Now, 2, 10),
            idea(3, Column::Now, 1, 50),
            idea(4, Column::Parking, 7, 10),
            idea(5, Column::Now, 2, 5),
            idea(6, Column::Now, 2, 5),
        ];
        sort_ideas(&mut ideas);
        let ids: Vec<i64> = ideas.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 3, 5, 6, 2, 1]);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            Move::parse("backlog", 1).unwrap_err().code,
            ErrorCode::InvalidColumn
        );
        assert_eq!(
            Move::parse("now", -1).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            Move::parse("wont-do", 0).unwrap(),
            Move {
                column: Column::WontDo,
                position: 0
            }
        );
    }

    #[test]
    fn move_into_parking_clears_in_progress() {
        let mut i = idea(1, Column::Now, 3, 0);
        i.in_progress = true;
        apply_move(
            &mut i,
            Move {
                column: Column::Parking,
                position: 2,
            },
        );
        assert_eq!((i.column, i.position, i.in_progress), (Column::Parking, 2, false));
    }

    #[test]
    fn move_elsewhere_keeps_in_progress() {
        let mut i = idea(1, Column::Now, 3, 0);
        i.in_progress = true;
        apply_move(
            &mut i,
            Move {
                column: Column::Next,
                position: 3,
            },
        );
        assert!(i.in_progress);
    }
}
