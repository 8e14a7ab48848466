//! Error code ranges

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Coarse grouping by code range; `System` errors are logged on the way out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx
    General,
    /// 1xxx
    Auth,
    /// 2xxx
    Permission,
    /// 4xxx
    Idea,
    /// 5xxx
    Feedback,
    /// 9xxx and anything unassigned
    System,
}

impl ErrorCategory {
    /// Codes outside the known ranges count as `System`
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Idea,
            5000..6000 => Self::Feedback,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(4101), ErrorCategory::Idea);
        assert_eq!(ErrorCategory::from_code(5002), ErrorCategory::Feedback);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::TokenInvalid.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::InvalidStatus.category(), ErrorCategory::Idea);
        assert_eq!(ErrorCode::RateLimited.category(), ErrorCategory::Feedback);
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Feedback).unwrap();
        assert_eq!(json, "\"feedback\"");
        let category: ErrorCategory = serde_json::from_str("\"idea\"").unwrap();
        assert_eq!(category, ErrorCategory::Idea);
    }
}
