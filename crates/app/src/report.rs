//! Plain-text rendering of statistics for the terminal.

use quiz_core::model::ChapterDetails;
use quiz_core::stats::{ChapterOverview, Counters, StatsAccumulator};

fn counters_line(counters: &Counters) -> String {
    format!(
        "{} questions, {} correct, {} incorrect, {} discuss, accuracy {}%, avg {:.1} min",
        counters.total,
        counters.correct,
        counters.incorrect,
        counters.discuss,
        counters.accuracy(),
        counters.average_time_minutes(),
    )
}

/// One bucket with its per-subject breakdown.
pub fn bucket(title: &str, stats: &StatsAccumulator) -> String {
    let mut out = format!("{title}: {}\n", counters_line(&stats.counters));
    for (subject, counters) in &stats.by_subject {
        out.push_str(&format!("  {subject}: {}\n", counters_line(counters)));
    }
    out
}

pub fn overview(subject: Option<&str>, overview: &ChapterOverview) -> String {
    format!(
        "{}: {} chapters, {} questions, accuracy {}%, avg {:.1} min\n",
        subject.unwrap_or("all subjects"),
        overview.chapters,
        overview.total_questions,
        overview.accuracy,
        overview.average_time_minutes,
    )
}

fn numbers(list: &[u32]) -> String {
    if list.is_empty() {
        return "-".to_owned();
    }
    list.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn details(details: &ChapterDetails) -> String {
    let mut out = String::new();
    let rows = [
        ("incorrect", &details.incorrect),
        ("discuss", &details.discuss),
        ("marked", &details.marked),
        ("2 attempts", &details.two_attempts),
        ("3+ attempts", &details.three_or_more_attempts),
    ];
    for (label, list) in rows {
        out.push_str(&format!("    {label}: {}\n", numbers(list)));
    }
    out
}
