pub mod dedup;
pub mod series;
pub mod streak;

use crate::classify::classify_optional;
use crate::defaults::Policy;
use crate::scoring::compute_score_with;
use crate::types::record::CheckInRecord;
use crate::types::thresholds::{ScoringThresholds, TrafficLight};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use tracing::{info, warn};

pub use series::{ProgressSeries, SeriesPoint};

/// Host-supplied context for aggregating one client's history.
#[derive(Debug, Clone, Copy)]
pub struct ProgressContext {
    pub today: NaiveDate,
    pub utc_offset: FixedOffset,
    pub thresholds: ScoringThresholds,
    pub policy: Policy,
}

impl ProgressContext {
    pub fn new(today: NaiveDate, thresholds: ScoringThresholds) -> Self {
        Self {
            today,
            utc_offset: Utc.fix(),
            thresholds,
            policy: Policy::default(),
        }
    }

    pub fn with_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub form_id: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub score: Option<u8>,
    pub status: TrafficLight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub deduped_records: Vec<CheckInRecord>,
    pub history: Vec<HistoryEntry>,
    pub total_submissions: usize,
    pub streak: u32,
    /// Percent of scored submissions within the consistency band of the mean.
    pub consistency: Option<u8>,
    /// Latest scored submission minus the earliest.
    pub improvement: Option<i16>,
    pub average_score: Option<u8>,
    pub series: Vec<ProgressSeries>,
}

pub fn aggregate_progress(records: &[CheckInRecord], ctx: &ProgressContext) -> ProgressSummary {
    let deduped = dedup::dedupe_submissions(records, &ctx.utc_offset);

    let history = deduped
        .iter()
        .map(|record| {
            let score = stored_score(record)
                .or_else(|| compute_score_with(&record.answers, &ctx.policy.scoring));
            HistoryEntry {
                id: record.id.clone(),
                form_id: record.form_id.clone(),
                submitted_at: record.submitted_at,
                score,
                status: classify_optional(score, &ctx.thresholds),
            }
        })
        .collect::<Vec<_>>();

    let scores = history
        .iter()
        .filter_map(|entry| entry.score)
        .collect::<Vec<_>>();

    let submission_days = deduped
        .iter()
        .filter_map(|record| record.submitted_day(&ctx.utc_offset))
        .collect::<Vec<_>>();

    let summary = ProgressSummary {
        total_submissions: deduped.len(),
        streak: streak::current_streak(&submission_days, ctx.today),
        consistency: consistency(&scores, ctx.policy.consistency_band),
        improvement: improvement(&scores),
        average_score: average(&scores).map(|mean| mean.round() as u8),
        series: series::build_series(
            &deduped,
            &ctx.utc_offset,
            &ctx.thresholds,
            &ctx.policy.scoring,
        ),
        history,
        deduped_records: deduped,
    };

    info!(
        raw = records.len(),
        deduped = summary.total_submissions,
        streak = summary.streak,
        series = summary.series.len(),
        "aggregated check-in progress"
    );
    summary
}

/// A stored score outside 0–100 is ignored so the answers are rescored.
fn stored_score(record: &CheckInRecord) -> Option<u8> {
    match record.score {
        Some(score) if score > 100 => {
            warn!(record = %record.id, score, "stored score out of range, recomputing");
            None
        }
        score => score,
    }
}

fn average(scores: &[u8]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let total: u32 = scores.iter().map(|score| u32::from(*score)).sum();
    Some(f64::from(total) / scores.len() as f64)
}

pub fn consistency(scores: &[u8], band: u8) -> Option<u8> {
    let mean = average(scores)?;
    let within = scores
        .iter()
        .filter(|score| (f64::from(**score) - mean).abs() <= f64::from(band))
        .count();
    Some((within as f64 / scores.len() as f64 * 100.0).round() as u8)
}

/// `scores` in chronological order.
pub fn improvement(scores: &[u8]) -> Option<i16> {
    match (scores.first(), scores.last()) {
        (Some(first), Some(last)) if scores.len() >= 2 => {
            Some(i16::from(*last) - i16::from(*first))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::answer::{AnswerValue, QuestionAnswer, QuestionType};
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 20).expect("valid date")
    }

    fn submitted(id: &str, assignment: &str, days_ago: i64, score: Option<u8>) -> CheckInRecord {
        let day = today() - Duration::days(days_ago);
        CheckInRecord {
            id: id.to_string(),
            schedule_assignment_id: Some(assignment.to_string()),
            form_id: "weekly".to_string(),
            due_date: day,
            submitted_at: Some(
                Utc.from_utc_datetime(&day.and_hms_opt(10, 0, 0).expect("valid time")),
            ),
            answers: Vec::new(),
            score,
        }
    }

    fn ctx() -> ProgressContext {
        ProgressContext::new(
            today(),
            ScoringThresholds {
                red_max: 33,
                orange_max: 80,
            },
        )
    }

    #[test]
    fn resubmission_counts_once_with_the_latest_score() {
        let records = vec![
            submitted("first-try", "A1", 2, Some(40)),
            submitted("resubmit", "A1", 0, Some(70)),
        ];
        let summary = aggregate_progress(&records, &ctx());
        assert_eq!(summary.total_submissions, 1);
        assert_eq!(summary.deduped_records[0].id, "resubmit");
        assert_eq!(summary.history[0].score, Some(70));
        assert_eq!(summary.history[0].status, TrafficLight::Orange);
    }

    #[test]
    fn streak_consistency_and_improvement() {
        let records = vec![
            submitted("a", "A1", 3, Some(50)),
            submitted("b", "A2", 1, Some(55)),
            submitted("c", "A3", 0, Some(90)),
        ];
        let summary = aggregate_progress(&records, &ctx());
        assert_eq!(summary.streak, 2);
        // mean 65: only 55 is within 10 points
        assert_eq!(summary.consistency, Some(33));
        assert_eq!(summary.improvement, Some(40));
        assert_eq!(summary.average_score, Some(65));
    }

    #[test]
    fn missing_scores_are_computed_from_answers() {
        let mut record = submitted("a", "A1", 0, None);
        record.answers = vec![QuestionAnswer::new(
            QuestionType::Scale,
            AnswerValue::Number(9.0),
            4,
        )
        .with_id("q1")];
        let summary = aggregate_progress(&[record], &ctx());
        assert_eq!(summary.history[0].score, Some(90));
        assert_eq!(summary.history[0].status, TrafficLight::Green);
        assert_eq!(summary.series.len(), 1);
    }

    #[test]
    fn out_of_range_stored_score_is_recomputed() {
        let mut corrupt = submitted("a", "A1", 1, Some(250));
        corrupt.answers = vec![QuestionAnswer::new(
            QuestionType::Scale,
            AnswerValue::Number(7.0),
            2,
        )];
        let records = vec![
            corrupt,
            submitted("b", "A2", 0, Some(50)),
            submitted("c", "A3", 2, Some(255)),
        ];
        let summary = aggregate_progress(&records, &ctx());
        let scores = summary
            .history
            .iter()
            .map(|entry| entry.score)
            .collect::<Vec<_>>();
        assert_eq!(scores, vec![None, Some(70), Some(50)]);
        assert_eq!(summary.history[0].status, TrafficLight::Grey);
        assert_eq!(summary.average_score, Some(60));
        assert_eq!(summary.improvement, Some(-20));
    }

    #[test]
    fn unscored_history_is_grey_and_excluded_from_statistics() {
        let records = vec![
            submitted("a", "A1", 1, None),
            submitted("b", "A2", 0, Some(60)),
        ];
        let summary = aggregate_progress(&records, &ctx());
        assert_eq!(summary.history[0].status, TrafficLight::Grey);
        assert_eq!(summary.average_score, Some(60));
        assert_eq!(summary.improvement, None);
        assert_eq!(summary.consistency, Some(100));
    }

    #[test]
    fn consistency_counts_scores_within_the_band() {
        // mean 60: every score is within 10
        assert_eq!(consistency(&[55, 60, 70, 55], 10), Some(100));
        // mean 50: 45 and 55 within 10, 20 and 80 outside
        assert_eq!(consistency(&[20, 45, 55, 80], 10), Some(50));
        assert_eq!(consistency(&[], 10), None);
    }

    #[test]
    fn improvement_is_an_endpoint_delta() {
        assert_eq!(improvement(&[70, 20, 95, 50]), Some(-20));
        assert_eq!(improvement(&[70]), None);
    }

    #[test]
    fn empty_history_yields_empty_summary() {
        let summary = aggregate_progress(&[], &ctx());
        assert_eq!(summary.total_submissions, 0);
        assert_eq!(summary.streak, 0);
        assert_eq!(summary.consistency, None);
        assert_eq!(summary.average_score, None);
        assert!(summary.series.is_empty());
    }
}
