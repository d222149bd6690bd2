use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Consecutive calendar days with a submission, counted back from `today`.
/// A submission today is day 0; no submission today means no streak.
pub fn current_streak(submission_days: &[NaiveDate], today: NaiveDate) -> u32 {
    let days = submission_days
        .iter()
        .filter(|day| **day <= today)
        .collect::<BTreeSet<_>>();

    let mut streak: u32 = 0;
    for day in days.into_iter().rev() {
        let days_diff = (today - *day).num_days();
        if days_diff == i64::from(streak) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
