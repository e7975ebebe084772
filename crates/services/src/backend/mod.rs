//! Contract with the quiz REST backend.

mod http;
mod wire;

use async_trait::async_trait;

use quiz_core::model::{
    HistoryEntry, Question, QuizId, QuizResult, QuizSummary, ResultId, SessionId, TimerWindow,
    UserId,
};

use crate::error::BackendError;

pub use http::{BackendConfig, HttpQuizBackend};

/// Calls the client makes against the quiz backend.
///
/// Implementations perform a single request per call; there is no retry or
/// backoff at this layer.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Question set for a quiz, in presentation order.
    async fn questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, BackendError>;

    /// Start time and duration of an attempt session.
    async fn timer_window(&self, session_id: &SessionId) -> Result<TimerWindow, BackendError>;

    /// Submit the ordered answer list for a session.
    async fn submit_answers(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        answers: &[String],
    ) -> Result<(), BackendError>;

    /// Open a new attempt session for `quiz_id`.
    async fn start_session(
        &self,
        quiz_id: &QuizId,
        user_id: &UserId,
    ) -> Result<SessionId, BackendError>;

    async fn result(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<QuizResult, BackendError>;

    async fn history(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, BackendError>;

    async fn send_result_email(&self, result_id: &ResultId) -> Result<(), BackendError>;

    async fn delete_result(&self, result_id: &ResultId) -> Result<(), BackendError>;

    /// Public quiz catalog.
    async fn quizzes(&self) -> Result<Vec<QuizSummary>, BackendError>;
}
