//! Public feedback: rate-limited thumbs-up and emoji reactions

pub mod emoji;
pub mod limiter;
pub mod service;

pub use limiter::{FeedbackAction, ReactionLimiter};
