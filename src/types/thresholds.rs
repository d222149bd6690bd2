use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest value `orange_max` may take so that green is never empty.
pub const MAX_ORANGE_BOUND: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Red,
    Orange,
    Green,
    /// Unscored. Never a synonym for a low score.
    Grey,
}

impl TrafficLight {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Grey => "grey",
        }
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical classification bounds: red `[0, red_max]`, orange
/// `[red_max + 1, orange_max]`, green `[orange_max + 1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringThresholds {
    pub red_max: u8,
    pub orange_max: u8,
}

impl ScoringThresholds {
    /// Builds thresholds, returning `None` when the bounds are out of order
    /// or out of range.
    pub fn new(red_max: i32, orange_max: i32) -> Option<Self> {
        let red_max = u8::try_from(red_max).ok()?;
        let orange_max = u8::try_from(orange_max).ok()?;
        if red_max < orange_max && orange_max <= MAX_ORANGE_BOUND {
            Some(Self {
                red_max,
                orange_max,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdProfile {
    Lifestyle,
    Moderate,
    HighPerformance,
    /// Caller-supplied bounds; falls back to the policy profile when invalid.
    #[default]
    Custom,
}

impl ThresholdProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lifestyle => "lifestyle",
            Self::Moderate => "moderate",
            Self::HighPerformance => "high-performance",
            Self::Custom => "custom",
        }
    }

    /// Built-in bounds for named profiles. `Custom` has none of its own.
    pub fn defaults(self) -> Option<ScoringThresholds> {
        match self {
            Self::Lifestyle => Some(ScoringThresholds {
                red_max: 33,
                orange_max: 80,
            }),
            Self::Moderate => Some(ScoringThresholds {
                red_max: 60,
                orange_max: 85,
            }),
            Self::HighPerformance => Some(ScoringThresholds {
                red_max: 75,
                orange_max: 89,
            }),
            Self::Custom => None,
        }
    }
}

impl FromStr for ThresholdProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lifestyle" => Ok(Self::Lifestyle),
            "moderate" => Ok(Self::Moderate),
            "high-performance" | "highperformance" => Ok(Self::HighPerformance),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown threshold profile: {other}")),
        }
    }
}

/// Thresholds as stored by collaborators, in either shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdInput {
    Canonical { red_max: i32, orange_max: i32 },
    /// Older `{red, yellow}` cut points: upper bounds of red and orange.
    Legacy { red: i32, yellow: i32 },
}

impl ThresholdInput {
    pub fn to_canonical(self) -> Option<ScoringThresholds> {
        match self {
            Self::Canonical {
                red_max,
                orange_max,
            } => ScoringThresholds::new(red_max, orange_max),
            Self::Legacy { red, yellow } => ScoringThresholds::new(red, yellow),
        }
    }
}

/// A client- or form-level threshold configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSetting {
    #[serde(default)]
    pub profile: ThresholdProfile,
    #[serde(default, alias = "red_max")]
    pub red_max: Option<i32>,
    #[serde(default, alias = "orange_max")]
    pub orange_max: Option<i32>,
    #[serde(default)]
    pub red: Option<i32>,
    #[serde(default)]
    pub yellow: Option<i32>,
}

impl ThresholdSetting {
    pub fn profile(profile: ThresholdProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn custom(red_max: i32, orange_max: i32) -> Self {
        Self {
            red_max: Some(red_max),
            orange_max: Some(orange_max),
            ..Self::default()
        }
    }

    pub fn legacy(red: i32, yellow: i32) -> Self {
        Self {
            red: Some(red),
            yellow: Some(yellow),
            ..Self::default()
        }
    }

    /// Canonical fields win over legacy ones when both are present.
    pub fn custom_input(&self) -> Option<ThresholdInput> {
        match (self.red_max, self.orange_max, self.red, self.yellow) {
            (Some(red_max), Some(orange_max), _, _) => Some(ThresholdInput::Canonical {
                red_max,
                orange_max,
            }),
            (_, _, Some(red), Some(yellow)) => Some(ThresholdInput::Legacy { red, yellow }),
            _ => None,
        }
    }
}
