//! Weighted check-in scoring.
//!
//! Each answer becomes a 0–10 sub-score according to its declared type, is
//! multiplied by its weight, and the weighted sum is normalized against the
//! best possible result into a 0–100 score. A submission where nothing
//! contributes has no score at all, which is different from a score of 0.

use crate::defaults::{ScoringPolicy, MAX_SUB_SCORE, MAX_WEIGHT};
use crate::types::answer::{AnswerValue, QuestionAnswer, QuestionType};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Why an answer did not contribute to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Text, date and time questions are context only.
    NotScorable,
    ZeroWeight,
    /// The value shape does not fit the declared type.
    MismatchedValue,
    NotANumber,
    MissingOptionWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerScore {
    pub question_id: Option<String>,
    pub sub_score: Option<f64>,
    pub weight: u8,
    pub excluded: Option<Exclusion>,
}

impl AnswerScore {
    pub fn counts(&self) -> bool {
        self.excluded.is_none()
    }

    /// Sub-score only when the answer takes part in the aggregate.
    pub fn scored_sub_score(&self) -> Option<f64> {
        if self.counts() {
            self.sub_score
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub answers: Vec<AnswerScore>,
    pub weighted_sum: f64,
    pub total_weight: u32,
    pub total: Option<u8>,
}

pub fn compute_score(answers: &[QuestionAnswer]) -> Option<u8> {
    compute_score_with(answers, &ScoringPolicy::default())
}

pub fn compute_score_with(answers: &[QuestionAnswer], policy: &ScoringPolicy) -> Option<u8> {
    score_breakdown(answers, policy).total
}

pub fn score_breakdown(answers: &[QuestionAnswer], policy: &ScoringPolicy) -> ScoreBreakdown {
    let scored = answers
        .iter()
        .map(|answer| score_answer(answer, policy))
        .collect::<Vec<_>>();

    // Sorted so the float sum does not depend on answer order.
    let mut contributions = scored
        .iter()
        .filter(|answer| answer.counts())
        .filter_map(|answer| answer.sub_score.map(|sub| sub * f64::from(answer.weight)))
        .collect::<Vec<_>>();
    contributions.sort_by(f64::total_cmp);
    let weighted_sum: f64 = contributions.iter().sum();

    let total_weight: u32 = scored
        .iter()
        .filter(|answer| answer.counts())
        .map(|answer| u32::from(answer.weight))
        .sum();

    let total = if total_weight == 0 {
        None
    } else {
        let max_weighted = f64::from(total_weight) * MAX_SUB_SCORE;
        let percent = (weighted_sum / max_weighted * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    };

    ScoreBreakdown {
        answers: scored,
        weighted_sum,
        total_weight,
        total,
    }
}

pub fn score_answer(answer: &QuestionAnswer, policy: &ScoringPolicy) -> AnswerScore {
    let question_id = answer.id().map(str::to_string);

    if !answer.declared_type.is_scorable() {
        let sub_score = match answer.declared_type {
            QuestionType::Text | QuestionType::Textarea => Some(policy.text_neutral),
            _ => None,
        };
        return AnswerScore {
            question_id,
            sub_score,
            weight: 0,
            excluded: Some(Exclusion::NotScorable),
        };
    }

    let weight = answer.weight.min(MAX_WEIGHT);
    match sub_score(answer, policy) {
        Ok(sub) => AnswerScore {
            question_id,
            sub_score: Some(sub),
            weight,
            excluded: (weight == 0).then_some(Exclusion::ZeroWeight),
        },
        Err(reason) => {
            debug!(
                question_id = answer.id().unwrap_or("-"),
                reason = ?reason,
                "answer excluded from score"
            );
            AnswerScore {
                question_id,
                sub_score: None,
                weight,
                excluded: Some(reason),
            }
        }
    }
}

/// Converts one answer to its 0–10 sub-score, ignoring weight.
pub fn sub_score(answer: &QuestionAnswer, policy: &ScoringPolicy) -> Result<f64, Exclusion> {
    match answer.declared_type {
        QuestionType::Scale | QuestionType::Number => match &answer.value {
            AnswerValue::Empty => Err(Exclusion::MismatchedValue),
            value => numeric_value(value)
                .map(|value| value.clamp(0.0, MAX_SUB_SCORE))
                .ok_or(Exclusion::NotANumber),
        },
        QuestionType::Boolean => {
            let flag = boolean_value(&answer.value).ok_or(Exclusion::MismatchedValue)?;
            Ok(boolean_weight(&answer.option_weights, flag).unwrap_or(if flag {
                policy.boolean_yes
            } else {
                policy.boolean_no
            }))
        }
        QuestionType::Select => match &answer.value {
            AnswerValue::Text(choice) => option_weight(&answer.option_weights, choice)
                .ok_or(Exclusion::MissingOptionWeight),
            AnswerValue::List(choices) if choices.len() == 1 => {
                option_weight(&answer.option_weights, &choices[0])
                    .ok_or(Exclusion::MissingOptionWeight)
            }
            AnswerValue::Number(choice) if choice.is_finite() => {
                option_weight(&answer.option_weights, &choice.to_string())
                    .ok_or(Exclusion::MissingOptionWeight)
            }
            _ => Err(Exclusion::MismatchedValue),
        },
        QuestionType::Multiselect => {
            let choices = match &answer.value {
                AnswerValue::List(choices) => choices.as_slice(),
                AnswerValue::Text(choice) => std::slice::from_ref(choice),
                _ => return Err(Exclusion::MismatchedValue),
            };
            let weights = choices
                .iter()
                .filter_map(|choice| option_weight(&answer.option_weights, choice))
                .collect::<Vec<_>>();
            if weights.is_empty() {
                return Err(Exclusion::MissingOptionWeight);
            }
            Ok(weights.iter().sum::<f64>() / weights.len() as f64)
        }
        QuestionType::Text | QuestionType::Textarea | QuestionType::Date | QuestionType::Time => {
            Err(Exclusion::NotScorable)
        }
    }
}

fn numeric_value(value: &AnswerValue) -> Option<f64> {
    let number = match value {
        AnswerValue::Number(number) => *number,
        AnswerValue::Text(text) => text.trim().parse::<f64>().ok()?,
        AnswerValue::Bool(_) | AnswerValue::List(_) | AnswerValue::Empty => return None,
    };
    number.is_finite().then_some(number)
}

fn boolean_value(value: &AnswerValue) -> Option<bool> {
    match value {
        AnswerValue::Bool(flag) => Some(*flag),
        AnswerValue::Text(text) => match text.trim().to_lowercase().as_str() {
            "yes" | "true" | "y" => Some(true),
            "no" | "false" | "n" => Some(false),
            _ => None,
        },
        AnswerValue::Number(_) | AnswerValue::List(_) | AnswerValue::Empty => None,
    }
}

fn boolean_weight(weights: &BTreeMap<String, f64>, flag: bool) -> Option<f64> {
    let labels: &[&str] = if flag { &["yes", "true"] } else { &["no", "false"] };
    labels
        .iter()
        .find_map(|label| option_weight(weights, label))
}

fn option_weight(weights: &BTreeMap<String, f64>, option: &str) -> Option<f64> {
    let weight = weights.get(option).copied().or_else(|| {
        let wanted = option.trim().to_lowercase();
        weights
            .iter()
            .find(|(key, _)| key.trim().to_lowercase() == wanted)
            .map(|(_, weight)| *weight)
    })?;
    weight
        .is_finite()
        .then(|| weight.clamp(0.0, MAX_SUB_SCORE))
}
