//! Error codes, `AppError` and the REST envelope
//!
//! Codes are grouped by range: 0xxx general, 1xxx auth, 2xxx permission,
//! 4xxx ideas and boards, 5xxx public feedback, 9xxx system.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::invalid_column("backlog");
//! assert_eq!(err.code, ErrorCode::InvalidColumn);
//!
//! let body = ApiResponse::<()>::error(&err);
//! assert_eq!(body.code, Some(4101));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
