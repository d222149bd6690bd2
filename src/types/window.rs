use serde::{Deserialize, Serialize};

/// Weekly availability rule attached to a check-in schedule.
///
/// Day and time are kept as the raw strings collaborators store; parsing is
/// lenient and happens at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringWindow {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub start_day: String,
    #[serde(default)]
    pub start_time: String,
}

impl RecurringWindow {
    pub fn new(start_day: &str, start_time: &str) -> Self {
        Self {
            enabled: true,
            start_day: start_day.to_string(),
            start_time: start_time.to_string(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_day: String::new(),
            start_time: String::new(),
        }
    }
}
