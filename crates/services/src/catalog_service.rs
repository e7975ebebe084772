use std::sync::Arc;

use quiz_core::model::{CatalogStats, QuizSummary};

use crate::Clock;
use crate::backend::QuizBackend;
use crate::error::BackendError;

/// The public quiz catalog.
#[derive(Clone)]
pub struct CatalogService {
    clock: Clock,
    backend: Arc<dyn QuizBackend>,
}

/// Catalog listing with its headline counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub quizzes: Vec<QuizSummary>,
    pub stats: CatalogStats,
}

impl CatalogService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn QuizBackend>) -> Self {
        Self { clock, backend }
    }

    /// # Errors
    ///
    /// Returns `BackendError` if the catalog cannot be fetched.
    pub async fn list(&self) -> Result<Catalog, BackendError> {
        let quizzes = self.backend.quizzes().await?;
        let stats = CatalogStats::from_quizzes(&quizzes, self.clock.now());
        Ok(Catalog { quizzes, stats })
    }
}
