//! Status / column / in-progress state machine
//!
//! | new status | column              | in progress |
//! |------------|---------------------|-------------|
//! | done       | release             | false       |
//! | archived   | wont-do             | false       |
//! | active     | parking, if it was in release or wont-do | unchanged |
//! | active     | unchanged otherwise | unchanged   |
//!
//! An explicit column then overrides the computed one. An explicit
//! `parking` clears in-progress whatever else the request says. An explicit
//! in-progress flag is honoured only for active ideas outside `parking`.

use shared::models::{Column, Idea, IdeaStatus};

/// Parsed status change request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusChange {
    pub status: Option<IdeaStatus>,
    pub column: Option<Column>,
    pub in_progress: Option<bool>,
}

impl StatusChange {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.column.is_none() && self.in_progress.is_none()
    }
}

/// Resulting `(status, column, in_progress)` for `change` applied to the
/// current `(status, column, in_progress)`
pub fn resolve(
    current: (IdeaStatus, Column, bool),
    change: StatusChange,
) -> (IdeaStatus, Column, bool) {
    let (mut status, mut column, mut in_progress) = current;

    if let Some(new_status) = change.status {
        status = new_status;
        match new_status {
            IdeaStatus::Done => {
                column = Column::Release;
                in_progress = false;
            }
            IdeaStatus::Archived => {
                column = Column::WontDo;
                in_progress = false;
            }
            IdeaStatus::Active => {
                if column.is_terminal() {
                    column = Column::Parking;
                }
            }
        }
    }

    if let Some(explicit) = change.column {
        column = explicit;
    }

    if change.column == Some(Column::Parking) {
        in_progress = false;
    } else if let Some(explicit) = change.in_progress {
        in_progress = explicit && status == IdeaStatus::Active && column != Column::Parking;
    }

    (status, column, in_progress)
}

/// Apply `change` to `idea` in place
pub fn apply_status_change(idea: &mut Idea, change: StatusChange) {
    let (status, column, in_progress) =
        resolve((idea.status, idea.column, idea.in_progress), change);
    idea.status = status;
    idea.column = column;
    idea.in_progress = in_progress;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_only(status: IdeaStatus) -> StatusChange {
        StatusChange {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn every_previous_column_and_new_status() {
        use Column::*;
        use IdeaStatus::*;

        // (previous column, new status) -> (column, in progress); starting in progress
        let cases = [
            (Now, Done, Release, false),
            (Release, Done, Release, false),
            (WontDo, Done, Release, false),
            (Now, Archived, WontDo, false),
            (Release, Archived, WontDo, false),
            (WontDo, Archived, WontDo, false),
            (Now, Active, Now, true),
            (Release, Active, Parking, true),
            (WontDo, Active, Parking, true),
        ];

        for (previous, new_status, expected_column, expected_in_progress) in cases {
            let (status, column, in_progress) =
                resolve((Active, previous, true), status_only(new_status));
            assert_eq!(status, new_status, "{previous} -> {new_status}");
            assert_eq!(column, expected_column, "{previous} -> {new_status}");
            assert_eq!(
                in_progress, expected_in_progress,
                "{previous} -> {new_status}"
            );
        }
    }

    #[test]
    fn active_from_open_column_keeps_in_progress() {
        let out = resolve(
            (IdeaStatus::Active, Column::Next, false),
            status_only(IdeaStatus::Active),
        );
        assert_eq!(out, (IdeaStatus::Active, Column::Next, false));
    }

    #[test]
    fn explicit_column_overrides_computed() {
        let out = resolve(
            (IdeaStatus::Active, Column::Now, false),
            StatusChange {
                status: Some(IdeaStatus::Done),
                column: Some(Column::Later),
                in_progress: None,
            },
        );
        assert_eq!(out, (IdeaStatus::Done, Column::Later, false));
    }

    #[test]
    fn parking_forces_in_progress_false() {
        let out = resolve(
            (IdeaStatus::Active, Column::Now, true),
            StatusChange {
                status: None,
                column: Some(Column::Parking),
                in_progress: Some(true),
            },
        );
        assert_eq!(out, (IdeaStatus::Active, Column::Parking, false));
    }

    #[test]
    fn reopened_idea_in_parking_cannot_be_flagged() {
        let out = resolve(
            (IdeaStatus::Done, Column::Release, false),
            StatusChange {
                status: Some(IdeaStatus::Active),
                column: None,
                in_progress: Some(true),
            },
        );
        assert_eq!(out, (IdeaStatus::Active, Column::Parking, false));
    }

    #[test]
    fn explicit_in_progress_applies_when_active() {
        let out = resolve(
            (IdeaStatus::Active, Column::Now, false),
            StatusChange {
                in_progress: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(out, (IdeaStatus::Active, Column::Now, true));
    }

    #[test]
    fn done_ignores_explicit_in_progress() {
        let out = resolve(
            (IdeaStatus::Active, Column::Now, true),
            StatusChange {
                status: Some(IdeaStatus::Done),
                column: None,
                in_progress: Some(true),
            },
        );
        assert_eq!(out, (IdeaStatus::Done, Column::Release, false));
    }

    #[test]
    fn apply_mutates_idea() {
        let mut idea = Idea {
            id: 1,
            board_id: 1,
            one_liner: "x".into(),
            description: String::new(),
            value_statement: String::new(),
            rice_score: Default::default(),
            column: Column::Now,
            position: 4,
            in_progress: true,
            status: IdeaStatus::Active,
            thumbs_up: 0,
            emoji_reactions: vec![],
            created_at: 0,
            updated_at: 0,
        };
        apply_status_change(&mut idea, status_only(IdeaStatus::Archived));
        assert_eq!(idea.column, Column::WontDo);
        assert!(!idea.in_progress);
        assert_eq!(idea.position, 4);
    }
}
