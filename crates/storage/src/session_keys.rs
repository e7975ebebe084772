//! Well-known keys in client-local storage.

use quiz_core::model::{QuizId, SessionId};

use crate::repository::{LocalStore, StorageError};

/// Key holding the identity provider's bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key under which the attempt session for `quiz_id` is stored.
#[must_use]
pub fn session_key(quiz_id: &QuizId) -> String {
    format!("quiz-session-{quiz_id}")
}

/// Read the session identifier recorded when `quiz_id` was started.
///
/// A blank stored value is treated as absent.
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be read.
pub async fn load_session_id(
    store: &dyn LocalStore,
    quiz_id: &QuizId,
) -> Result<Option<SessionId>, StorageError> {
    let raw = store.get(&session_key(quiz_id)).await?;
    Ok(raw.and_then(|value| SessionId::new(value).ok()))
}

/// # Errors
///
/// Returns `StorageError` if the store cannot be written.
pub async fn save_session_id(
    store: &dyn LocalStore,
    quiz_id: &QuizId,
    session_id: &SessionId,
) -> Result<(), StorageError> {
    store.set(&session_key(quiz_id), session_id.as_str()).await
}

/// # Errors
///
/// Returns `StorageError` if the store cannot be read.
pub async fn load_auth_token(store: &dyn LocalStore) -> Result<Option<String>, StorageError> {
    let token = store.get(AUTH_TOKEN_KEY).await?;
    Ok(token.filter(|t| !t.trim().is_empty()))
}

/// # Errors
///
/// Returns `StorageError` if the store cannot be written.
pub async fn save_auth_token(store: &dyn LocalStore, token: &str) -> Result<(), StorageError> {
    store.set(AUTH_TOKEN_KEY, token).await
}
