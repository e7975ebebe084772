use chrono::{DateTime, Utc};

use crate::model::QuizId;

/// A quiz as listed in the public catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_marks: u32,
    pub total_questions: u32,
}

impl QuizSummary {
    /// A quiz is active until its end time has passed.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.end_time > now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total: usize,
    pub active: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn from_quizzes(quizzes: &[QuizSummary], now: DateTime<Utc>) -> Self {
        Self {
            total: quizzes.len(),
            active: quizzes.iter().filter(|q| q.is_active(now)).count(),
        }
    }
}
