use crate::types::record::CheckInRecord;
use chrono::{FixedOffset, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupeKey {
    Assignment(String),
    FormDay(String, NaiveDate),
}

fn dedupe_key(record: &CheckInRecord, offset: &FixedOffset) -> Option<DedupeKey> {
    if let Some(assignment) = record.assignment_id() {
        return Some(DedupeKey::Assignment(assignment.to_string()));
    }
    record
        .submitted_day(offset)
        .map(|day| DedupeKey::FormDay(record.form_id.clone(), day))
}

/// Keeps the latest submission per scheduled assignment, or per form and
/// calendar day when the assignment is unknown. Unsubmitted records are
/// dropped. The result is sorted by submission time, oldest first.
pub fn dedupe_submissions(records: &[CheckInRecord], offset: &FixedOffset) -> Vec<CheckInRecord> {
    let mut latest: HashMap<DedupeKey, &CheckInRecord> = HashMap::new();

    for record in records.iter().filter(|record| record.submitted_at.is_some()) {
        let Some(key) = dedupe_key(record, offset) else {
            continue;
        };
        let replace = match latest.get(&key) {
            Some(existing) if existing.submitted_at >= record.submitted_at => {
                debug!(kept = %existing.id, dropped = %record.id, "duplicate submission");
                false
            }
            Some(existing) => {
                debug!(kept = %record.id, dropped = %existing.id, "duplicate submission");
                true
            }
            None => true,
        };
        if replace {
            latest.insert(key, record);
        }
    }

    let mut deduped = latest.into_values().cloned().collect::<Vec<_>>();
    deduped.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    deduped
}
