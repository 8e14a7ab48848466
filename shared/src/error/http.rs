//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// HTTP status returned alongside this code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::IdeaNotFound | Self::BoardNotFound => StatusCode::NOT_FOUND,

            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,

            // Live channel cap reached; retry later
            Self::ResourceLimitExceeded => StatusCode::SERVICE_UNAVAILABLE,

            Self::Unknown | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // Validation and domain-enum violations
            Self::ValidationFailed
            | Self::InvalidColumn
            | Self::InvalidStatus
            | Self::InvalidRiceScore
            | Self::InvalidEmoji => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::IdeaNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::BoardNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_permission_and_auth_status() {
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::TokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_rate_limited_status() {
        assert_eq!(
            ErrorCode::RateLimited.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_domain_violations_are_bad_request() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidColumn,
            ErrorCode::InvalidStatus,
            ErrorCode::InvalidRiceScore,
            ErrorCode::InvalidEmoji,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
