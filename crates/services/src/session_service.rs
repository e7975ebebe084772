use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::model::{QuizId, SessionId, UserId};
use storage::repository::LocalStore;
use storage::session_keys::{load_session_id, save_session_id};

use crate::backend::QuizBackend;
use crate::error::SessionError;

/// Starts attempt sessions and manages their locally stored identifiers.
#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn QuizBackend>,
    store: Arc<dyn LocalStore>,
}

impl SessionService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>, store: Arc<dyn LocalStore>) -> Self {
        Self { backend, store }
    }

    /// Open a new attempt for `quiz_id` and remember its session identifier
    /// so the attempt screen can find it.
    ///
    /// Nothing is stored when the backend refuses the start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Backend` if the start request fails and
    /// `SessionError::Storage` if the identifier cannot be persisted.
    pub async fn start(&self, quiz_id: &QuizId, user_id: &UserId) -> Result<SessionId, SessionError> {
        let session_id = self
            .backend
            .start_session(quiz_id, user_id)
            .await
            .inspect_err(|err| warn!(quiz_id = %quiz_id, error = %err, "failed to start quiz"))?;
        save_session_id(self.store.as_ref(), quiz_id, &session_id).await?;
        info!(quiz_id = %quiz_id, session_id = %session_id, "attempt session started");
        Ok(session_id)
    }

    /// The stored session for `quiz_id`, if the quiz was started on this client.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn session_for(&self, quiz_id: &QuizId) -> Result<Option<SessionId>, SessionError> {
        Ok(load_session_id(self.store.as_ref(), quiz_id).await?)
    }

    /// Forget everything kept in client-local storage (sessions and auth token).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be cleared.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        info!("local storage cleared");
        Ok(())
    }
}
