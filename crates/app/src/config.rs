use std::env;

use dotenvy::dotenv;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_DB_URL: &str = "sqlite://quiz-client.sqlite3";

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub user_id: Option<String>,
    pub auth_token: Option<String>,
    pub db_url: String,
    pub rust_log: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            api_base_url: non_blank("QUIZ_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.into()),
            user_id: non_blank("QUIZ_USER_ID"),
            auth_token: non_blank("QUIZ_AUTH_TOKEN"),
            db_url: non_blank("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into()),
            rust_log: non_blank("RUST_LOG").unwrap_or_else(|| "info".into()),
        }
    }
}
