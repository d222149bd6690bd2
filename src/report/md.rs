use crate::progress::ProgressSummary;

fn optional<T: std::fmt::Display>(value: Option<T>, suffix: &str) -> String {
    value
        .map(|value| format!("{value}{suffix}"))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn to_markdown(summary: &ProgressSummary) -> String {
    let mut output = String::new();
    output.push_str("# Check-in Progress\n\n");
    output.push_str("## Summary\n\n");
    output.push_str(&format!(
        "- submissions: {}\n- streak: {} day(s)\n- average score: {}\n- consistency: {}\n- improvement: {}\n\n",
        summary.total_submissions,
        summary.streak,
        optional(summary.average_score, ""),
        optional(summary.consistency, "%"),
        summary
            .improvement
            .map(|delta| format!("{delta:+}"))
            .unwrap_or_else(|| "n/a".to_string()),
    ));

    output.push_str("## History\n\n");
    if summary.history.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for entry in &summary.history {
            output.push_str(&format!(
                "- {} [{}] {}: {}\n",
                entry
                    .submitted_at
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                entry.status,
                entry.id,
                optional(entry.score, ""),
            ));
        }
        output.push('\n');
    }

    output.push_str("## Questions\n\n");
    if summary.series.is_empty() {
        output.push_str("- none\n");
        return output;
    }

    let weeks = summary
        .series
        .iter()
        .flat_map(|series| series.points.iter().map(|point| point.week_index + 1))
        .max()
        .unwrap_or(0);
    for series in &summary.series {
        let cells = (0..weeks)
            .map(|week| match series.point_at(week) {
                Some(point) => match point.score {
                    Some(score) => format!("{score:.1} {}", point.status),
                    None => point.status.to_string(),
                },
                None => "-".to_string(),
            })
            .collect::<Vec<_>>();
        output.push_str(&format!(
            "- {} ({}): {}\n",
            series.label.as_deref().unwrap_or(&series.identity),
            series.identity,
            cells.join(" | ")
        ));
    }

    output
}
