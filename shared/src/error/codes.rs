//! Numeric error codes shared by the server, the client and browser front ends
//!
//! Values are part of the wire format and never change meaning.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable numeric error code, serialized as a bare `u16`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,

    NotAuthenticated = 1001,
    TokenExpired = 1003,
    TokenInvalid = 1004,

    /// Caller does not own the board
    PermissionDenied = 2001,

    IdeaNotFound = 4001,
    /// Missing, or private and requested anonymously
    BoardNotFound = 4002,
    /// Not one of the six board columns
    InvalidColumn = 4101,
    /// Not one of active / done / archived
    InvalidStatus = 4102,
    InvalidRiceScore = 4103,

    /// Emoji outside the allow-list
    InvalidEmoji = 5001,
    /// Same feedback from the same IP inside the throttle window
    RateLimited = 5002,

    InternalError = 9001,
    /// Per-board live connection cap reached
    ResourceLimitExceeded = 9004,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 17] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::NotAuthenticated,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::PermissionDenied,
        ErrorCode::IdeaNotFound,
        ErrorCode::BoardNotFound,
        ErrorCode::InvalidColumn,
        ErrorCode::InvalidStatus,
        ErrorCode::InvalidRiceScore,
        ErrorCode::InvalidEmoji,
        ErrorCode::RateLimited,
        ErrorCode::InternalError,
        ErrorCode::ResourceLimitExceeded,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Stock message used when an error carries no custom one
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Not found",
            ErrorCode::NotAuthenticated => "Sign in required",
            ErrorCode::TokenExpired => "Token expired",
            ErrorCode::TokenInvalid => "Token invalid",
            ErrorCode::PermissionDenied => "Only the board owner can do this",
            ErrorCode::IdeaNotFound => "Idea not found",
            ErrorCode::BoardNotFound => "Board not found",
            ErrorCode::InvalidColumn => "Invalid column",
            ErrorCode::InvalidStatus => "Invalid status",
            ErrorCode::InvalidRiceScore => "Invalid RICE score",
            ErrorCode::InvalidEmoji => "Emoji is not allowed",
            ErrorCode::RateLimited => "Too many requests, try again later",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ResourceLimitExceeded => "Too many live connections",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Raw value with no matching [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
