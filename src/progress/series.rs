//! Per-question trend lines across a client's submissions.
//!
//! Question ids are not stable across form edits, so each answer is matched
//! to a series through an ordered list of candidate keys: the id, then the
//! exact question text, then a normalized alias of the text first seen for
//! that series. The first key already known to the index wins.

use crate::classify::classify_sub_score;
use crate::defaults::ScoringPolicy;
use crate::scoring::score_answer;
use crate::types::answer::{AnswerValue, QuestionAnswer, QuestionType};
use crate::types::record::CheckInRecord;
use crate::types::thresholds::{ScoringThresholds, TrafficLight};
use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Id(String),
    Text(String),
    Alias(String),
}

impl IdentityKey {
    /// Candidate keys for an answer, highest priority first.
    pub fn candidates(answer: &QuestionAnswer) -> Vec<IdentityKey> {
        let mut keys = Vec::with_capacity(3);
        if let Some(id) = answer.id() {
            keys.push(Self::Id(id.to_string()));
        }
        if let Some(text) = answer.text() {
            keys.push(Self::Text(text.to_string()));
            keys.push(Self::Alias(normalize_alias(text)));
        }
        keys
    }
}

pub fn normalize_alias(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Default)]
pub struct IdentityIndex {
    slots: HashMap<IdentityKey, usize>,
}

impl IdentityIndex {
    pub fn resolve(&self, candidates: &[IdentityKey]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|key| self.slots.get(key).copied())
    }

    /// Registers every candidate of a newly observed question.
    pub fn register_new(&mut self, candidates: &[IdentityKey], slot: usize) {
        for key in candidates {
            self.slots.entry(key.clone()).or_insert(slot);
        }
    }

    /// Teaches the index the ids and texts a matched answer arrived with.
    /// Aliases stay pinned to the first observation.
    pub fn register_seen(&mut self, candidates: &[IdentityKey], slot: usize) {
        for key in candidates {
            if !matches!(key, IdentityKey::Alias(_)) {
                self.slots.entry(key.clone()).or_insert(slot);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub week_index: usize,
    pub date: NaiveDate,
    /// 0–10 sub-score; absent when the answer is unscored.
    pub score: Option<f64>,
    pub status: TrafficLight,
    pub raw_answer: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSeries {
    pub identity: String,
    pub label: Option<String>,
    pub question_type: QuestionType,
    /// Only weeks with an answer; missing weeks are gaps.
    pub points: Vec<SeriesPoint>,
}

impl ProgressSeries {
    pub fn point_at(&self, week_index: usize) -> Option<&SeriesPoint> {
        self.points
            .iter()
            .find(|point| point.week_index == week_index)
    }
}

/// Builds one series per logical question. `records` must already be in
/// chronological order; records without answers are skipped and do not
/// take up a week.
pub fn build_series(
    records: &[CheckInRecord],
    offset: &FixedOffset,
    thresholds: &ScoringThresholds,
    policy: &ScoringPolicy,
) -> Vec<ProgressSeries> {
    let mut index = IdentityIndex::default();
    let mut series: Vec<ProgressSeries> = Vec::new();

    let answered = records.iter().filter(|record| !record.answers.is_empty());
    for (week_index, record) in answered.enumerate() {
        let date = record.submitted_day(offset).unwrap_or(record.due_date);
        let mut filled = HashSet::new();

        for answer in &record.answers {
            let candidates = IdentityKey::candidates(answer);
            if candidates.is_empty() {
                debug!(record = %record.id, "answer without id or text skipped");
                continue;
            }

            let slot = match index.resolve(&candidates) {
                Some(slot) => {
                    index.register_seen(&candidates, slot);
                    slot
                }
                None => {
                    let slot = series.len();
                    index.register_new(&candidates, slot);
                    series.push(ProgressSeries {
                        identity: answer
                            .id()
                            .or_else(|| answer.text())
                            .unwrap_or_default()
                            .to_string(),
                        label: answer.text().map(str::to_string),
                        question_type: answer.declared_type,
                        points: Vec::new(),
                    });
                    slot
                }
            };

            if !filled.insert(slot) {
                debug!(
                    record = %record.id,
                    identity = %series[slot].identity,
                    "second answer for the same question in one submission dropped"
                );
                continue;
            }

            let scored = score_answer(answer, policy);
            let score = scored.scored_sub_score();
            let entry = &mut series[slot];
            if entry.label.is_none() {
                entry.label = answer.text().map(str::to_string);
            }
            entry.points.push(SeriesPoint {
                week_index,
                date,
                score,
                status: classify_sub_score(score, thresholds),
                raw_answer: answer.value.clone(),
            });
        }
    }

    series
}
