//! Idea lifecycle: creation, edits, moves and status transitions

pub mod position;
pub mod service;
pub mod transition;

pub use position::{Move, sort_ideas};
pub use transition::{StatusChange, apply_status_change};
