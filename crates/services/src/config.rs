use std::env;

use quiz_core::model::UserEmail;

/// Endpoint configuration for one quiz client instance.
///
/// Defaults match the development servers; everything can be overridden
/// through the environment.
#[derive(Clone, Debug)]
pub struct QuizConfig {
    /// Question server (`ws://` or `wss://`).
    pub ws_url: String,
    /// Base URL of the embed-lookup / upload HTTP API.
    pub api_base_url: String,
    /// Base URL of the document database; `None` keeps reports in memory.
    pub store_base_url: Option<String>,
    /// Signed-in user, as provided by the auth layer.
    pub user_email: Option<UserEmail>,
}

impl QuizConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let ws_url =
            env::var("QUIZ_WS_URL").unwrap_or_else(|_| "ws://localhost:8765".into());
        let api_base_url =
            env::var("QUIZ_API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".into());
        let store_base_url = env::var("QUIZ_STORE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let user_email = env::var("QUIZ_USER_EMAIL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(UserEmail::new);

        Self {
            ws_url,
            api_base_url,
            store_base_url,
            user_email,
        }
    }
}
