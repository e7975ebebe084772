use crate::model::QuestionId;

/// A single multiple-choice question as served for an attempt.
///
/// Questions are immutable once loaded; options keep the order the backend
/// returned them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, prompt: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the option at `index`, if any.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}
