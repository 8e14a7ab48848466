//! Client error types

use std::time::Duration;
use thiserror::Error;

/// REST call failure, mapped from the HTTP status of the `ApiResponse` envelope
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to board-server failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx without the expected `data`, or a body that is not an envelope
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// 401: missing, invalid or expired token
    #[error("not signed in")]
    Unauthorized,

    /// 403: caller does not own the board
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 404: idea or board missing (private boards look missing too)
    #[error("not found: {0}")]
    NotFound(String),

    /// 400: bad payload, column, status, RICE score or emoji
    #[error("rejected: {0}")]
    Validation(String),

    /// 429: feedback sent again inside the throttle window
    #[error("rate limited, retry in {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("server error: {0}")]
    Internal(String),

    #[error("malformed JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Live channel failure; the worker logs these and reconnects
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("cannot derive live URL from {0}")]
    InvalidUrl(String),

    #[error("malformed live message: {0}")]
    Serialization(#[from] serde_json::Error),
}
