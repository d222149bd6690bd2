use crate::progress::ProgressSummary;

pub fn to_json(summary: &ProgressSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_contains_statistics() {
        let summary = ProgressSummary {
            deduped_records: vec![],
            history: vec![],
            total_submissions: 0,
            streak: 3,
            consistency: Some(75),
            improvement: None,
            average_score: Some(64),
            series: vec![],
        };

        let rendered = to_json(&summary).expect("json should serialize");
        assert!(rendered.contains("\"streak\": 3"));
        assert!(rendered.contains("\"consistency\": 75"));
        assert!(rendered.contains("\"improvement\": null"));
    }
}
