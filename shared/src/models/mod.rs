//! Data models
//!
//! Shared between board-server and board-client (via API).
//! All IDs are `i64` snowflakes, timestamps are Unix milliseconds.

pub mod board;
pub mod column;
pub mod idea;
pub mod rice;

// Re-exports
pub use board::*;
pub use column::*;
pub use idea::*;
pub use rice::*;
