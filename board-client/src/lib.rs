//! Board Client - HTTP and live channel client for board-server
//!
//! - [`HttpClient`]: owner and public REST calls
//! - [`live`]: WebSocket subscription with reconnect backoff
//! - [`BoardView`] and [`DragMachine`]: reconciliation of local board state

pub mod config;
pub mod drag;
pub mod error;
pub mod http;
pub mod live;
pub mod reconcile;
pub mod reconnect;

pub use config::{ClientConfig, LiveConfig};
pub use drag::{DragMachine, DragState, DropIntent};
pub use error::{ClientError, ClientResult, LiveError};
pub use http::{BoardApi, HttpClient};
pub use live::LiveHandle;
pub use reconcile::{BoardView, LiveEffect, Notice};
pub use reconnect::{Backoff, ConnectionState};

// Re-export shared types for convenience
pub use shared::live::LiveMessage;
pub use shared::models::{Column, Idea, IdeaStatus};
