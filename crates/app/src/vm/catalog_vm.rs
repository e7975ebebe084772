use chrono::{DateTime, Utc};
use services::Catalog;

use super::time_fmt::format_datetime;

#[must_use]
pub fn map_catalog(catalog: &Catalog, now: DateTime<Utc>) -> Vec<String> {
    let mut lines: Vec<String> = catalog
        .quizzes
        .iter()
        .map(|quiz| {
            let status = if quiz.is_active(now) { "open  " } else { "closed" };
            format!(
                "{status} {} [{}] {} questions, {} marks, ends {}",
                quiz.title,
                quiz.id,
                quiz.total_questions,
                quiz.total_marks,
                format_datetime(quiz.end_time)
            )
        })
        .collect();
    lines.push(format!(
        "{} quizzes, {} active",
        catalog.stats.total, catalog.stats.active
    ));
    lines
}
