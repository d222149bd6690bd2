use crate::classify;
use crate::defaults::{Policy, ScoringPolicy, MAX_SUB_SCORE};
use crate::error::EngineError;
use crate::types::thresholds::{ScoringThresholds, ThresholdProfile, ThresholdSetting};
use crate::window::weekday_from_name;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    pub policy: Option<PolicyConfig>,
    pub client_thresholds: Option<ThresholdSetting>,
    pub form_thresholds: Option<ThresholdSetting>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    pub boolean_yes: Option<f64>,
    pub boolean_no: Option<f64>,
    pub text_neutral: Option<f64>,
    pub fallback_start_day: Option<String>,
    pub fallback_profile: Option<String>,
    pub consistency_band: Option<u8>,
}

impl EngineConfig {
    /// Effective policy: configured values over the built-in defaults.
    /// Unparsable names keep the default; `validate` reports them.
    pub fn policy(&self) -> Policy {
        let defaults = Policy::default();
        let Some(policy) = &self.policy else {
            return defaults;
        };
        Policy {
            scoring: ScoringPolicy {
                boolean_yes: policy.boolean_yes.unwrap_or(defaults.scoring.boolean_yes),
                boolean_no: policy.boolean_no.unwrap_or(defaults.scoring.boolean_no),
                text_neutral: policy
                    .text_neutral
                    .unwrap_or(defaults.scoring.text_neutral),
            },
            fallback_start_day: policy
                .fallback_start_day
                .as_deref()
                .and_then(weekday_from_name)
                .unwrap_or(defaults.fallback_start_day),
            fallback_profile: policy
                .fallback_profile
                .as_deref()
                .and_then(|name| name.parse().ok())
                .unwrap_or(defaults.fallback_profile),
            consistency_band: policy.consistency_band.unwrap_or(defaults.consistency_band),
        }
    }

    pub fn thresholds(&self) -> ScoringThresholds {
        classify::resolve_thresholds(
            self.client_thresholds.as_ref(),
            self.form_thresholds.as_ref(),
            &self.policy(),
        )
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(policy) = &self.policy {
            for (key, value) in [
                ("boolean_yes", policy.boolean_yes),
                ("boolean_no", policy.boolean_no),
                ("text_neutral", policy.text_neutral),
            ] {
                if let Some(value) = value {
                    if !(0.0..=MAX_SUB_SCORE).contains(&value) {
                        return Err(EngineError::ConfigParse(format!(
                            "policy.{key} must be between 0 and 10"
                        )));
                    }
                }
            }

            if let Some(day) = &policy.fallback_start_day {
                if weekday_from_name(day).is_none() {
                    return Err(EngineError::ConfigParse(format!(
                        "policy.fallback_start_day is not a day of the week: {day}"
                    )));
                }
            }

            if let Some(name) = &policy.fallback_profile {
                let profile = name
                    .parse::<ThresholdProfile>()
                    .map_err(EngineError::ConfigParse)?;
                if profile.defaults().is_none() {
                    return Err(EngineError::ConfigParse(
                        "policy.fallback_profile must name a built-in profile, not custom"
                            .to_string(),
                    ));
                }
            }

            if let Some(band) = policy.consistency_band {
                if band > 100 {
                    return Err(EngineError::ConfigParse(
                        "policy.consistency_band must be between 0 and 100".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn empty_config_uses_builtin_policy() {
        let cfg: EngineConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(cfg.policy(), Policy::default());
        assert_eq!(
            cfg.thresholds(),
            ScoringThresholds {
                red_max: 33,
                orange_max: 80
            }
        );
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[policy]
boolean_yes = 9.0
boolean_no = 2.0
fallback_start_day = "monday"
fallback_profile = "moderate"
consistency_band = 15

[client_thresholds]
profile = "custom"
red_max = 40
orange_max = 75

[form_thresholds]
profile = "high-performance"
"#;
        let cfg: EngineConfig = toml::from_str(toml_str).expect("full config should parse");
        assert!(cfg.validate().is_ok());
        let policy = cfg.policy();
        assert_eq!(policy.scoring.boolean_yes, 9.0);
        assert_eq!(policy.scoring.text_neutral, 5.0);
        assert_eq!(policy.fallback_start_day, Weekday::Mon);
        assert_eq!(policy.fallback_profile, ThresholdProfile::Moderate);
        assert_eq!(policy.consistency_band, 15);
        assert_eq!(
            cfg.thresholds(),
            ScoringThresholds {
                red_max: 40,
                orange_max: 75
            }
        );
    }

    #[test]
    fn form_thresholds_apply_when_client_is_absent() {
        let cfg: EngineConfig = toml::from_str(
            r#"
[form_thresholds]
red = 50
yellow = 70
"#,
        )
        .expect("config should parse");
        assert_eq!(
            cfg.thresholds(),
            ScoringThresholds {
                red_max: 50,
                orange_max: 70
            }
        );
    }

    #[test]
    fn inverted_thresholds_fall_back_to_profile_defaults() {
        let cfg: EngineConfig = toml::from_str(
            r#"
[client_thresholds]
profile = "moderate"
red = 80
yellow = 33
"#,
        )
        .expect("config should parse");
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.thresholds(),
            ScoringThresholds {
                red_max: 60,
                orange_max: 85
            }
        );
    }

    #[test]
    fn validate_rejects_unknown_start_day() {
        let cfg: EngineConfig = toml::from_str(
            r#"
[policy]
fallback_start_day = "someday"
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("fallback_start_day"));
    }

    #[test]
    fn validate_rejects_custom_fallback_profile() {
        let cfg: EngineConfig = toml::from_str(
            r#"
[policy]
fallback_profile = "custom"
"#,
        )
        .expect("config should parse");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_boolean_score_out_of_range() {
        let cfg: EngineConfig = toml::from_str(
            r#"
[policy]
boolean_yes = 12.0
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("policy.boolean_yes"));
    }
}
