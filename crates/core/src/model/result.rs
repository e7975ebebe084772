use crate::model::{ResultId, SessionId};

/// Marks awarded per correct answer.
pub const MARKS_PER_QUESTION: u32 = 2;

/// Percentage at or above which a result is celebrated.
pub const CELEBRATION_PERCENT: f64 = 80.0;

const MISSING_ANSWER: &str = "Not Answered";
const MISSING_CORRECT: &str = "N/A";

/// Graded outcome of one attempt as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub name: String,
    pub quiz_name: String,
    pub total_questions: u32,
    pub score: f64,
    pub questions: Vec<String>,
    pub submitted_answers: Vec<String>,
    pub correct_answers: Vec<String>,
}

/// One question of a result, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub number: usize,
    pub question: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl QuizResult {
    #[must_use]
    pub fn max_marks(&self) -> u32 {
        self.total_questions.saturating_mul(MARKS_PER_QUESTION)
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        let max = self.max_marks();
        if max == 0 {
            return 0.0;
        }
        self.score / f64::from(max) * 100.0
    }

    #[must_use]
    pub fn celebrates(&self) -> bool {
        self.percentage() >= CELEBRATION_PERCENT
    }

    /// Per-question breakdown in question order.
    ///
    /// Missing or empty submitted answers show as `Not Answered`, missing
    /// correct answers as `N/A`.
    #[must_use]
    pub fn lines(&self) -> Vec<ResultLine> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let your_answer = non_empty(self.submitted_answers.get(index), MISSING_ANSWER);
                let correct_answer = non_empty(self.correct_answers.get(index), MISSING_CORRECT);
                ResultLine {
                    number: index + 1,
                    question: question.clone(),
                    is_correct: your_answer == correct_answer,
                    your_answer,
                    correct_answer,
                }
            })
            .collect()
    }
}

fn non_empty(value: Option<&String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .map_or_else(|| fallback.to_owned(), Clone::clone)
}

/// One entry of a student's result history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub session_id: SessionId,
    pub result_id: ResultId,
    pub quiz_title: String,
    pub quiz_description: String,
    pub score: f64,
    pub total_questions: u32,
}
