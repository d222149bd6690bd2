use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Number,
    Select,
    Multiselect,
    #[serde(alias = "rating")]
    Scale,
    Boolean,
    Date,
    Time,
}

impl QuestionType {
    /// Free-form and calendar answers are shown to the coach but never scored.
    pub fn is_scorable(self) -> bool {
        !matches!(self, Self::Text | Self::Textarea | Self::Date | Self::Time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    /// Unanswered: `null` or a missing `value`.
    #[default]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub value: AnswerValue,
    #[serde(rename = "type", alias = "declaredType")]
    pub declared_type: QuestionType,
    #[serde(default)]
    pub weight: u8,
    #[serde(default)]
    pub option_weights: BTreeMap<String, f64>,
}

impl QuestionAnswer {
    pub fn new(declared_type: QuestionType, value: AnswerValue, weight: u8) -> Self {
        Self {
            question_id: None,
            question_text: None,
            value,
            declared_type,
            weight,
            option_weights: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.question_id = Some(id.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.question_text = Some(text.to_string());
        self
    }

    pub fn with_option_weight(mut self, option: &str, weight: f64) -> Self {
        self.option_weights.insert(option.to_string(), weight);
        self
    }

    /// The question id, treating an empty or blank id as missing.
    pub fn id(&self) -> Option<&str> {
        self.question_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn text(&self) -> Option<&str> {
        self.question_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
