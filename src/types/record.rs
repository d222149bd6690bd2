use crate::types::answer::QuestionAnswer;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    Pending,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub id: String,
    #[serde(default)]
    pub schedule_assignment_id: Option<String>,
    pub form_id: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<QuestionAnswer>,
    #[serde(default)]
    pub score: Option<u8>,
}

impl CheckInRecord {
    pub fn status(&self, today: NaiveDate) -> CheckInStatus {
        if self.submitted_at.is_some() {
            CheckInStatus::Completed
        } else if self.due_date < today {
            CheckInStatus::Overdue
        } else {
            CheckInStatus::Pending
        }
    }

    /// Calendar day of the submission as seen in the client's timezone.
    pub fn submitted_day(&self, offset: &FixedOffset) -> Option<NaiveDate> {
        self.submitted_at
            .map(|at| at.with_timezone(offset).date_naive())
    }

    pub fn assignment_id(&self) -> Option<&str> {
        self.schedule_assignment_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(due: NaiveDate, submitted_at: Option<DateTime<Utc>>) -> CheckInRecord {
        CheckInRecord {
            id: "r1".to_string(),
            schedule_assignment_id: None,
            form_id: "f1".to_string(),
            due_date: due,
            submitted_at,
            answers: Vec::new(),
            score: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn status_is_derived_from_due_date_and_submission() {
        let today = date(2026, 1, 14);
        assert_eq!(
            record(date(2026, 1, 12), None).status(today),
            CheckInStatus::Overdue
        );
        assert_eq!(
            record(date(2026, 1, 14), None).status(today),
            CheckInStatus::Pending
        );
        let submitted = Utc.with_ymd_and_hms(2026, 1, 13, 8, 0, 0).single();
        assert_eq!(
            record(date(2026, 1, 12), submitted).status(today),
            CheckInStatus::Completed
        );
    }

    #[test]
    fn submitted_day_respects_client_offset() {
        let late_evening_utc = Utc.with_ymd_and_hms(2026, 1, 13, 23, 30, 0).single();
        let rec = record(date(2026, 1, 12), late_evening_utc);
        let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        assert_eq!(rec.submitted_day(&plus_two), Some(date(2026, 1, 14)));
    }
}
