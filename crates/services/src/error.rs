//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizId;
use storage::repository::StorageError;

/// Errors emitted by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("response data rejected: {0}")]
    Invalid(#[from] quiz_core::Error),
    #[error("cannot build request url: {0}")]
    Url(String),
    #[error("request task ended unexpectedly: {0}")]
    Task(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while building the HTTP backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid backend url {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("backend url {0:?} cannot be used as a base")]
    NotABase(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Errors emitted by the attempt controller.
///
/// Every variant is also surfaced to the user as a notice; none of them is
/// fatal to the application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("no attempt session found for quiz {quiz_id}; start the quiz first")]
    MissingSession { quiz_id: QuizId },
    #[error("failed to load questions")]
    Questions(#[source] BackendError),
    #[error("failed to fetch quiz timer")]
    Timer(#[source] BackendError),
    #[error("failed to submit quiz")]
    Submit(#[source] BackendError),
    #[error("no submission in flight")]
    NoSubmissionInFlight,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
