use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::model::{HistoryEntry, QuizResult, ResultId, ResultRoute, UserId};

use crate::backend::QuizBackend;
use crate::error::BackendError;

/// Results of finished attempts and the student's history.
#[derive(Clone)]
pub struct ResultService {
    backend: Arc<dyn QuizBackend>,
}

impl ResultService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>) -> Self {
        Self { backend }
    }

    /// Fetch the graded result the attempt screen handed off to.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the result data is incomplete.
    pub async fn fetch(&self, route: &ResultRoute) -> Result<QuizResult, BackendError> {
        self.backend
            .result(&route.session_id, &route.user_id)
            .await
            .inspect_err(|err| {
                warn!(session_id = %route.session_id, error = %err, "failed to fetch result");
            })
    }

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body is not a list.
    pub async fn history(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, BackendError> {
        self.backend.history(user_id).await
    }

    /// Ask the backend to e-mail a result to its owner.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on a failed request or non-success status.
    pub async fn send_email(&self, result_id: &ResultId) -> Result<(), BackendError> {
        self.backend.send_result_email(result_id).await?;
        info!(result_id = %result_id, "result e-mail requested");
        Ok(())
    }

    /// Delete a result and return the history without it.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on a failed request or non-success status; the
    /// history is left untouched in that case.
    pub async fn delete(
        &self,
        result_id: &ResultId,
        history: Vec<HistoryEntry>,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        self.backend.delete_result(result_id).await?;
        info!(result_id = %result_id, "result deleted");
        Ok(history
            .into_iter()
            .filter(|entry| &entry.result_id != result_id)
            .collect())
    }
}
