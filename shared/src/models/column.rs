//! Board columns and idea lifecycle status
//!
//! Both are closed enums. Free-form strings from requests are parsed with
//! [`FromStr`], which yields `InvalidColumn` / `InvalidStatus` app errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Kanban lane an idea occupies
///
/// Declaration order is the canonical display order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    Parking,
    Now,
    Next,
    Later,
    Release,
    WontDo,
}

impl Column {
    /// All columns in canonical order
    pub const ALL: [Column; 6] = [
        Column::Parking,
        Column::Now,
        Column::Next,
        Column::Later,
        Column::Release,
        Column::WontDo,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Column::Parking => "parking",
            Column::Now => "now",
            Column::Next => "next",
            Column::Later => "later",
            Column::Release => "release",
            Column::WontDo => "wont-do",
        }
    }

    /// Columns that hold finished or rejected work
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Column::Release | Column::WontDo)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::invalid_column(s))
    }
}

/// Lifecycle status of an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    #[default]
    Active,
    Done,
    Archived,
}

impl IdeaStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Active => "active",
            IdeaStatus::Done => "done",
            IdeaStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(IdeaStatus::Active),
            "done" => Ok(IdeaStatus::Done),
            "archived" => Ok(IdeaStatus::Archived),
            other => Err(AppError::invalid_status(other)),
        }
    }
}
