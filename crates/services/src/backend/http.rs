use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, warn};
use url::Url;

use quiz_core::model::{
    HistoryEntry, Question, QuizId, QuizResult, QuizSummary, ResultId, SessionId, TimerWindow,
    UserId,
};
use storage::repository::LocalStore;
use storage::session_keys::load_auth_token;

use super::{wire, QuizBackend};
use crate::error::{BackendError, ConfigError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute URL that can carry a path.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidUrl {
            raw: base_url.to_owned(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::NotABase(base_url.to_owned()));
        }
        Ok(Self {
            base_url: parsed,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Url` if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// `QuizBackend` over HTTP.
///
/// Every request carries the bearer token found under `authToken` in local
/// storage, when one is present.
#[derive(Clone)]
pub struct HttpQuizBackend {
    client: Client,
    config: BackendConfig,
    store: Arc<dyn LocalStore>,
}

impl HttpQuizBackend {
    /// # Errors
    ///
    /// Returns `ConfigError::Client` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig, store: Arc<dyn LocalStore>) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            store,
        })
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, BackendError> {
        debug!(%method, %url, "backend request");
        let mut builder = self.client.request(method, url);
        if let Some(token) = load_auth_token(self.store.as_ref()).await? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send and return the body of a successful response.
    async fn send(builder: RequestBuilder) -> Result<String, BackendError> {
        let response = builder.send().await.inspect_err(|err| {
            warn!(error = %err, "backend request failed");
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, url = %response.url(), "backend returned an error status");
            return Err(BackendError::HttpStatus(status));
        }
        Ok(response.text().await?)
    }

    async fn get_json<T, F>(&self, url: Url, decode: F) -> Result<T, BackendError>
    where
        F: FnOnce(&str) -> Result<T, BackendError>,
    {
        let body = Self::send(self.request(Method::GET, url).await?).await?;
        decode(&body)
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, BackendError> {
        let url = self
            .config
            .endpoint(&["student", "questions", quiz_id.as_str()])?;
        self.get_json(url, wire::decode_questions).await
    }

    async fn timer_window(&self, session_id: &SessionId) -> Result<TimerWindow, BackendError> {
        let url = self.config.endpoint(&[
            "student",
            "quiz",
            "remaining-time",
            session_id.as_str(),
        ])?;
        self.get_json(url, wire::decode_timer).await
    }

    async fn submit_answers(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        answers: &[String],
    ) -> Result<(), BackendError> {
        let url = self
            .config
            .endpoint(&["student", "quiz", "submit", session_id.as_str()])?;
        let builder = self
            .request(Method::POST, url)
            .await?
            .query(&[("uid", user_id.as_str())])
            .json(answers);
        Self::send(builder).await?;
        Ok(())
    }

    async fn start_session(
        &self,
        quiz_id: &QuizId,
        user_id: &UserId,
    ) -> Result<SessionId, BackendError> {
        let url = self.config.endpoint(&["student", "start"])?;
        let builder = self
            .request(Method::POST, url)
            .await?
            .query(&[("quizId", quiz_id.as_str()), ("uid", user_id.as_str())]);
        let body = Self::send(builder).await?;
        wire::decode_session_id(&body)
    }

    async fn result(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<QuizResult, BackendError> {
        let url = self
            .config
            .endpoint(&["student", "result", session_id.as_str()])?;
        let builder = self
            .request(Method::GET, url)
            .await?
            .query(&[("uid", user_id.as_str())]);
        let body = Self::send(builder).await?;
        wire::decode_result(&body)
    }

    async fn history(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, BackendError> {
        let url = self
            .config
            .endpoint(&["student", "results", user_id.as_str()])?;
        self.get_json(url, wire::decode_history).await
    }

    async fn send_result_email(&self, result_id: &ResultId) -> Result<(), BackendError> {
        let url = self.config.endpoint(&["student", "result", "send"])?;
        let builder = self
            .request(Method::POST, url)
            .await?
            .query(&[("resultId", result_id.as_str())]);
        Self::send(builder).await?;
        Ok(())
    }

    async fn delete_result(&self, result_id: &ResultId) -> Result<(), BackendError> {
        let url = self
            .config
            .endpoint(&["student", "result", "delete", result_id.as_str()])?;
        Self::send(self.request(Method::DELETE, url).await?).await?;
        Ok(())
    }

    async fn quizzes(&self) -> Result<Vec<QuizSummary>, BackendError> {
        let url = self.config.endpoint(&["public", "allQuizzes"])?;
        self.get_json(url, wire::decode_quizzes).await
    }
}
