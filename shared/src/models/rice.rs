//! RICE priority score

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Allowed confidence values
pub const RICE_CONFIDENCE_VALUES: [i32; 4] = [1, 2, 4, 8];

/// Upper bound for reach, impact and effort
pub const RICE_COMPONENT_MAX: i32 = 100;

/// Reach / Impact / Confidence / Effort
///
/// Components are held as `i32` so that out-of-range input reaches
/// [`RiceScore::validate`] instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiceScore {
    pub reach: i32,
    pub impact: i32,
    pub confidence: i32,
    pub effort: i32,
}

impl Default for RiceScore {
    fn default() -> Self {
        Self {
            reach: 0,
            impact: 0,
            confidence: 1,
            effort: 0,
        }
    }
}

impl RiceScore {
    /// Reach, impact and effort in 0..=100; confidence one of 1, 2, 4, 8
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("reach", self.reach),
            ("impact", self.impact),
            ("effort", self.effort),
        ] {
            if !(0..=RICE_COMPONENT_MAX).contains(&value) {
                return Err(AppError::invalid_rice_score(format!(
                    "{} must be between 0 and {}",
                    name, RICE_COMPONENT_MAX
                ))
                .with_detail("field", name)
                .with_detail("value", value));
            }
        }
        if !RICE_CONFIDENCE_VALUES.contains(&self.confidence) {
            return Err(
                AppError::invalid_rice_score("confidence must be one of 1, 2, 4, 8")
                    .with_detail("field", "confidence")
                    .with_detail("value", self.confidence),
            );
        }
        Ok(())
    }
}
