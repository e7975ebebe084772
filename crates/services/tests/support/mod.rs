#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use quiz_core::model::{
    HistoryEntry, Question, QuestionId, QuizId, QuizResult, QuizSummary, ResultId, SessionId,
    TimerWindow, UserId,
};
use services::{BackendError, QuizBackend};
use storage::repository::InMemoryStore;
use storage::session_keys::save_session_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub answers: Vec<String>,
}

/// Scriptable in-memory backend.
#[derive(Default)]
pub struct FakeBackend {
    questions: Mutex<Option<Vec<Question>>>,
    window: Mutex<Option<TimerWindow>>,
    submit_failures: Mutex<VecDeque<StatusCode>>,
    submit_delay: Mutex<Option<Duration>>,
    submissions: Mutex<Vec<Submission>>,
    started: Mutex<Option<SessionId>>,
    result: Mutex<Option<QuizResult>>,
    history: Mutex<Vec<HistoryEntry>>,
    emails: Mutex<Vec<ResultId>>,
    deleted: Mutex<Vec<ResultId>>,
    quizzes: Mutex<Vec<QuizSummary>>,
}

fn unavailable() -> BackendError {
    BackendError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE)
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(self, count: usize) -> Self {
        *self.questions.lock().unwrap() = Some(questions(count));
        self
    }

    pub fn with_window(self, started_at: DateTime<Utc>, minutes: f64) -> Self {
        *self.window.lock().unwrap() = Some(TimerWindow::new(started_at, minutes).unwrap());
        self
    }

    pub fn failing_submits(self, count: usize) -> Self {
        self.submit_failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat_n(StatusCode::INTERNAL_SERVER_ERROR, count));
        self
    }

    pub fn with_submit_delay(self, delay: Duration) -> Self {
        *self.submit_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn with_started_session(self, session_id: &str) -> Self {
        *self.started.lock().unwrap() = Some(SessionId::new(session_id).unwrap());
        self
    }

    pub fn with_result(self, result: QuizResult) -> Self {
        *self.result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_history(self, history: Vec<HistoryEntry>) -> Self {
        *self.history.lock().unwrap() = history;
        self
    }

    pub fn with_quizzes(self, quizzes: Vec<QuizSummary>) -> Self {
        *self.quizzes.lock().unwrap() = quizzes;
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn emails(&self) -> Vec<ResultId> {
        self.emails.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<ResultId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizBackend for FakeBackend {
    async fn questions(&self, _quiz_id: &QuizId) -> Result<Vec<Question>, BackendError> {
        self.questions.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn timer_window(&self, _session_id: &SessionId) -> Result<TimerWindow, BackendError> {
        self.window.lock().unwrap().ok_or_else(unavailable)
    }

    async fn submit_answers(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        answers: &[String],
    ) -> Result<(), BackendError> {
        self.submissions.lock().unwrap().push(Submission {
            session_id: session_id.clone(),
            user_id: user_id.clone(),
            answers: answers.to_vec(),
        });
        let delay = *self.submit_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.submit_failures.lock().unwrap().pop_front();
        match failure {
            Some(status) => Err(BackendError::HttpStatus(status)),
            None => Ok(()),
        }
    }

    async fn start_session(
        &self,
        _quiz_id: &QuizId,
        _user_id: &UserId,
    ) -> Result<SessionId, BackendError> {
        self.started.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn result(
        &self,
        _session_id: &SessionId,
        _user_id: &UserId,
    ) -> Result<QuizResult, BackendError> {
        self.result.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn history(&self, _user_id: &UserId) -> Result<Vec<HistoryEntry>, BackendError> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn send_result_email(&self, result_id: &ResultId) -> Result<(), BackendError> {
        self.emails.lock().unwrap().push(result_id.clone());
        Ok(())
    }

    async fn delete_result(&self, result_id: &ResultId) -> Result<(), BackendError> {
        self.deleted.lock().unwrap().push(result_id.clone());
        Ok(())
    }

    async fn quizzes(&self) -> Result<Vec<QuizSummary>, BackendError> {
        Ok(self.quizzes.lock().unwrap().clone())
    }
}

pub fn questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| {
            Question::new(
                QuestionId::new(format!("q{i}")).unwrap(),
                format!("Question {i}"),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
            )
        })
        .collect()
}

pub fn quiz_id() -> QuizId {
    QuizId::new("quiz-1").unwrap()
}

pub fn user_id() -> UserId {
    UserId::new("user-1").unwrap()
}

pub fn session_id() -> SessionId {
    SessionId::new("session-1").unwrap()
}

/// A store where `quiz_id()` has already been started as `session_id()`.
pub async fn started_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    save_session_id(&store, &quiz_id(), &session_id())
        .await
        .unwrap();
    Arc::new(store)
}
