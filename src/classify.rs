//! Traffic-light classification of scores against configured thresholds.

use crate::defaults::Policy;
use crate::types::thresholds::{
    ScoringThresholds, ThresholdInput, ThresholdProfile, ThresholdSetting, TrafficLight,
};
use tracing::warn;

pub fn classify(score: u8, thresholds: &ScoringThresholds) -> TrafficLight {
    let score = score.min(100);
    if score <= thresholds.red_max {
        TrafficLight::Red
    } else if score <= thresholds.orange_max {
        TrafficLight::Orange
    } else {
        TrafficLight::Green
    }
}

/// Classifies against a named profile. `Custom` has no bounds of its own and
/// resolves to the policy fallback profile.
pub fn classify_profile(score: u8, profile: ThresholdProfile, policy: &Policy) -> TrafficLight {
    classify(score, &profile_thresholds(profile, policy))
}

/// `None` means unscored and is always grey.
pub fn classify_optional(score: Option<u8>, thresholds: &ScoringThresholds) -> TrafficLight {
    match score {
        Some(score) => classify(score, thresholds),
        None => TrafficLight::Grey,
    }
}

/// Classifies a 0–10 per-question sub-score on the 0–100 scale.
pub fn classify_sub_score(sub_score: Option<f64>, thresholds: &ScoringThresholds) -> TrafficLight {
    let scaled = sub_score
        .filter(|value| value.is_finite())
        .map(|value| (value * 10.0).round().clamp(0.0, 100.0) as u8);
    classify_optional(scaled, thresholds)
}

pub fn profile_thresholds(profile: ThresholdProfile, policy: &Policy) -> ScoringThresholds {
    profile
        .defaults()
        .or_else(|| policy.fallback_profile.defaults())
        .unwrap_or(FALLBACK_THRESHOLDS)
}

/// Used only if the policy itself names `Custom` as its fallback.
const FALLBACK_THRESHOLDS: ScoringThresholds = ScoringThresholds {
    red_max: 33,
    orange_max: 80,
};

/// Converts either threshold shape to canonical bounds, substituting the
/// profile defaults when the converted bounds are invalid.
pub fn convert_thresholds(
    input: ThresholdInput,
    profile: ThresholdProfile,
    policy: &Policy,
) -> ScoringThresholds {
    match input.to_canonical() {
        Some(thresholds) => thresholds,
        None => {
            let fallback = profile_thresholds(profile, policy);
            warn!(
                input = ?input,
                profile = profile.as_str(),
                red_max = fallback.red_max,
                orange_max = fallback.orange_max,
                "invalid threshold ordering, using profile defaults"
            );
            fallback
        }
    }
}

impl ThresholdSetting {
    /// Custom values override the profile default when they are valid.
    pub fn resolve(&self, policy: &Policy) -> ScoringThresholds {
        match self.custom_input() {
            Some(input) => convert_thresholds(input, self.profile, policy),
            None => profile_thresholds(self.profile, policy),
        }
    }
}

/// Client configuration wins, then the form's, then the policy fallback
/// profile when nothing is configured at all.
pub fn resolve_thresholds(
    client: Option<&ThresholdSetting>,
    form: Option<&ThresholdSetting>,
    policy: &Policy,
) -> ScoringThresholds {
    client
        .or(form)
        .map(|setting| setting.resolve(policy))
        .unwrap_or_else(|| profile_thresholds(policy.fallback_profile, policy))
}
