use quiz_core::model::{HistoryEntry, MARKS_PER_QUESTION, QuizResult};

/// A graded attempt laid out for the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultVm {
    pub heading: String,
    pub score_line: String,
    pub celebrate: bool,
    pub lines: Vec<String>,
}

#[must_use]
pub fn map_result(result: &QuizResult) -> ResultVm {
    let heading = if result.name.is_empty() {
        result.quiz_name.clone()
    } else {
        format!("{} - {}", result.quiz_name, result.name)
    };
    let score_line = format!(
        "Score: {} / {} ({:.1}%)",
        result.score,
        result.max_marks(),
        result.percentage()
    );
    let lines = result
        .lines()
        .into_iter()
        .map(|line| {
            let verdict = if line.is_correct { "correct" } else { "wrong" };
            format!(
                "{}. {}\n   your answer: {} | correct: {} | {verdict}",
                line.number, line.question, line.your_answer, line.correct_answer
            )
        })
        .collect();
    ResultVm {
        heading,
        score_line,
        celebrate: result.celebrates(),
        lines,
    }
}

#[must_use]
pub fn map_history(entries: &[HistoryEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No results yet.".into()];
    }
    entries
        .iter()
        .map(|entry| {
            let max = entry.total_questions.saturating_mul(MARKS_PER_QUESTION);
            format!(
                "{}  {}  {} / {}  (session {})",
                entry.result_id, entry.quiz_title, entry.score, max, entry.session_id
            )
        })
        .collect()
}
