//! Policy defaults used whenever input or configuration is silent.
//!
//! Every fallback the engine applies lives here and is carried through
//! [`Policy`], so configuration and tests can override it in one place.

use crate::types::thresholds::ThresholdProfile;
use chrono::Weekday;

pub const DEFAULT_START_DAY: Weekday = Weekday::Fri;
pub const DEFAULT_PROFILE: ThresholdProfile = ThresholdProfile::Lifestyle;

pub const BOOLEAN_YES_SCORE: f64 = 8.0;
pub const BOOLEAN_NO_SCORE: f64 = 3.0;
pub const TEXT_NEUTRAL_SCORE: f64 = 5.0;

pub const MAX_WEIGHT: u8 = 10;
pub const MAX_SUB_SCORE: f64 = 10.0;

/// Points either side of the mean that still count as "consistent".
pub const CONSISTENCY_BAND: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub boolean_yes: f64,
    pub boolean_no: f64,
    pub text_neutral: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            boolean_yes: BOOLEAN_YES_SCORE,
            boolean_no: BOOLEAN_NO_SCORE,
            text_neutral: TEXT_NEUTRAL_SCORE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub scoring: ScoringPolicy,
    pub fallback_start_day: Weekday,
    pub fallback_profile: ThresholdProfile,
    pub consistency_band: u8,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            fallback_start_day: DEFAULT_START_DAY,
            fallback_profile: DEFAULT_PROFILE,
            consistency_band: CONSISTENCY_BAND,
        }
    }
}
