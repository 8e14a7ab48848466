//! Emoji allow-list

use shared::AppError;

pub const ALLOWED_EMOJIS: [&str; 12] = [
    "👍", "❤️", "🎉", "🚀", "👀", "💡", "🔥", "😄", "🤔", "👏", "💯", "⭐",
];

pub fn is_allowed(emoji: &str) -> bool {
    ALLOWED_EMOJIS.contains(&emoji)
}

/// Returns the glyph unchanged if it is on the list
pub fn validate(emoji: &str) -> Result<&str, AppError> {
    if is_allowed(emoji) {
        Ok(emoji)
    } else {
        Err(AppError::invalid_emoji(emoji))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn accepts_listed_glyphs() {
        for e in ALLOWED_EMOJIS {
            assert!(validate(e).is_ok(), "{e}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for e in ["🦀", "", "👍👍", ":+1:", "❤"] {
            assert_eq!(validate(e).unwrap_err().code, ErrorCode::InvalidEmoji, "{e:?}");
        }
    }
}
