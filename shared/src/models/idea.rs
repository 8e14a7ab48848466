//! Idea Model

use serde::{Deserialize, Serialize};

use super::{Column, IdeaStatus, RiceScore};
use crate::error::{AppError, AppResult};

pub const ONE_LINER_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const VALUE_STATEMENT_MAX_CHARS: usize = 500;

/// Per-emoji reaction counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiReaction {
    pub emoji: String,
    pub count: u32,
}

/// Idea entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: i64,
    pub board_id: i64,
    pub one_liner: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value_statement: String,
    #[serde(default)]
    pub rice_score: RiceScore,
    pub column: Column,
    /// Ordering key within the column; not unique, not contiguous
    pub position: u32,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(default)]
    pub thumbs_up: u32,
    #[serde(default)]
    pub emoji_reactions: Vec<EmojiReaction>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Idea {
    /// Increment the entry for `emoji`, appending `{emoji, 1}` when absent
    pub fn add_emoji(&mut self, emoji: &str) {
        match self.emoji_reactions.iter_mut().find(|r| r.emoji == emoji) {
            Some(reaction) => reaction.count += 1,
            None => self.emoji_reactions.push(EmojiReaction {
                emoji: emoji.to_string(),
                count: 1,
            }),
        }
    }

    /// Apply a partial field edit (already validated)
    pub fn apply_update(&mut self, update: &IdeaUpdate) {
        if let Some(ref one_liner) = update.one_liner {
            self.one_liner = one_liner.trim().to_string();
        }
        if let Some(ref description) = update.description {
            self.description = description.clone();
        }
        if let Some(ref value_statement) = update.value_statement {
            self.value_statement = value_statement.clone();
        }
        if let Some(rice_score) = update.rice_score {
            self.rice_score = rice_score;
        }
    }
}

/// Naive append slot for a column: count of ideas already there, plus one
pub fn append_position(ideas: &[Idea], column: Column) -> u32 {
    let count = ideas.iter().filter(|i| i.column == column).count();
    u32::try_from(count).unwrap_or(u32::MAX).saturating_add(1)
}

/// Create idea payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaCreate {
    pub one_liner: String,
    pub description: Option<String>,
    pub value_statement: Option<String>,
    pub rice_score: Option<RiceScore>,
    /// Raw column name; defaults to `parking`
    pub column: Option<String>,
}

impl IdeaCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_one_liner(&self.one_liner)?;
        validate_text("description", self.description.as_deref(), DESCRIPTION_MAX_CHARS)?;
        validate_text(
            "valueStatement",
            self.value_statement.as_deref(),
            VALUE_STATEMENT_MAX_CHARS,
        )?;
        if let Some(ref rice) = self.rice_score {
            rice.validate()?;
        }
        Ok(())
    }
}

/// Update idea payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaUpdate {
    pub one_liner: Option<String>,
    pub description: Option<String>,
    pub value_statement: Option<String>,
    pub rice_score: Option<RiceScore>,
}

impl IdeaUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref one_liner) = self.one_liner {
            validate_one_liner(one_liner)?;
        }
        validate_text("description", self.description.as_deref(), DESCRIPTION_MAX_CHARS)?;
        validate_text(
            "valueStatement",
            self.value_statement.as_deref(),
            VALUE_STATEMENT_MAX_CHARS,
        )?;
        if let Some(ref rice) = self.rice_score {
            rice.validate()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.one_liner.is_none()
            && self.description.is_none()
            && self.value_statement.is_none()
            && self.rice_score.is_none()
    }
}

/// Move payload (drag and drop)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub column: String,
    pub position: i64,
}

/// Status change payload; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: Option<String>,
    pub in_progress: Option<bool>,
    pub column: Option<String>,
}

/// Emoji reaction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionCreate {
    pub emoji: String,
}

/// Thumbs-up result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbsUpCount {
    pub thumbs_up: u32,
}

fn validate_one_liner(one_liner: &str) -> AppResult<()> {
    let trimmed = one_liner.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("One-liner is required").with_detail("field", "oneLiner"));
    }
    validate_text("oneLiner", Some(trimmed), ONE_LINER_MAX_CHARS)
}

fn validate_text(field: &str, value: Option<&str>, max_chars: usize) -> AppResult<()> {
    match value {
        Some(v) if v.chars().count() > max_chars => Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        ))
        .with_detail("field", field)
        .with_detail("max", max_chars)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sample() -> Idea {
        Idea {
            id: 1,
            board_id: 10,
            one_liner: "Dark mode".to_string(),
            description: String::new(),
            value_statement: String::new(),
            rice_score: RiceScore::default(),
            column: Column::Parking,
            position: 1,
            in_progress: false,
            status: IdeaStatus::Active,
            thumbs_up: 0,
            emoji_reactions: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn same_emoji_twice_merges_into_one_entry() {
        let mut idea = sample();
        idea.add_emoji("🎉");
        idea.add_emoji("🚀");
        idea.add_emoji("🎉");

        assert_eq!(
            idea.emoji_reactions,
            vec![
                EmojiReaction {
                    emoji: "🎉".to_string(),
                    count: 2
                },
                EmojiReaction {
                    emoji: "🚀".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn create_requires_one_liner() {
        let err = IdeaCreate {
            one_liner: "   ".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn create_enforces_lengths_in_chars() {
        let ok = IdeaCreate {
            one_liner: "é".repeat(ONE_LINER_MAX_CHARS),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_long = IdeaCreate {
            one_liner: "idea".to_string(),
            description: Some("x".repeat(DESCRIPTION_MAX_CHARS + 1)),
            ..Default::default()
        };
        let err = too_long.validate().unwrap_err();
        assert_eq!(err.details.unwrap().get("field").unwrap(), "description");
    }

    #[test]
    fn create_checks_rice_score() {
        let bad = IdeaCreate {
            one_liner: "idea".to_string(),
            rice_score: Some(RiceScore {
                reach: 10,
                impact: 10,
                confidence: 3,
                effort: 10,
            }),
            ..Default::default()
        };
        assert_eq!(bad.validate().unwrap_err().code, ErrorCode::InvalidRiceScore);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut idea = sample();
        idea.description = "keep".to_string();
        idea.apply_update(&IdeaUpdate {
            one_liner: Some("  Darker mode ".to_string()),
            ..Default::default()
        });
        assert_eq!(idea.one_liner, "Darker mode");
        assert_eq!(idea.description, "keep");
    }

    #[test]
    fn append_position_counts_target_column() {
        let at = |id, column, position| Idea {
            id,
            column,
            position,
            ..sample()
        };
        let ideas = vec![at(1, Column::Now, 1), at(2, Column::Now, 9), at(3, Column::Later, 1)];
        assert_eq!(append_position(&ideas, Column::Now), 3);
        assert_eq!(append_position(&ideas, Column::Release), 1);
    }

    #[test]
    fn idea_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["oneLiner"], "Dark mode");
        assert_eq!(json["column"], "parking");
        assert_eq!(json["inProgress"], false);
        assert_eq!(json["status"], "active");
        assert_eq!(json["thumbsUp"], 0);
    }
}
