//! board-server: collaborative idea board backend
//!
//! - Owner API: create, edit, move and change the status of ideas
//! - Public API: filtered board reads plus throttled thumbs-up / emoji feedback
//! - Live channel: per-board WebSocket fan-out of moves, status changes and feedback

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ideas;
pub mod live;
pub mod logger;
pub mod notify;
pub mod reactions;
pub mod state;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
