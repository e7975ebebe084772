use std::collections::HashMap;

use crate::model::{Question, QuestionId};

/// Placeholder submitted for every question without a recorded selection.
pub const NOT_ANSWERED: &str = "not answered";

/// Selected option per question.
///
/// Holds at most one selection per question; selecting again replaces the
/// previous choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    selections: HashMap<QuestionId, String>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option` as the answer for `question_id`, replacing any prior one.
    pub fn select(&mut self, question_id: QuestionId, option: impl Into<String>) {
        self.selections.insert(question_id, option.into());
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<&str> {
        self.selections.get(question_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Build the ordered answer payload: one entry per question, in question
    /// order, with [`NOT_ANSWERED`] wherever nothing was selected.
    ///
    /// Selections for ids not present in `questions` are ignored.
    #[must_use]
    pub fn to_submission(&self, questions: &[Question]) -> Vec<String> {
        questions
            .iter()
            .map(|question| {
                self.get(question.id())
                    .filter(|answer| !answer.is_empty())
                    .unwrap_or(NOT_ANSWERED)
                    .to_owned()
            })
            .collect()
    }
}
