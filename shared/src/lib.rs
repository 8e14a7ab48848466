//! Shared types for the idea board
//!
//! Domain models, the live wire protocol and the unified error system,
//! used by both `board-server` and `board-client`.

pub mod error;
pub mod live;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use live::{FeedbackEvent, FeedbackKind, IdeaEvent, IdeaRef, LiveCommand, LiveMessage};
pub use models::{Board, Column, EmojiReaction, Idea, IdeaStatus, PublicIdea, RiceScore, VisibleField};
