use std::time::Duration;

use async_trait::async_trait;
use common::AttemptDetail;
use reqwest::{Client, Method, RequestBuilder, Response};
use thiserror::Error;
use tracing::warn;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// REST operations the attempts table needs.
#[async_trait]
pub trait AttemptsApi: Send + Sync {
    /// Full detail, including source code and per-test results.
    async fn attempt(&self, id: i32) -> Result<AttemptDetail, ApiError>;

    async fn rerun(&self, id: i32) -> Result<(), ApiError>;

    async fn purchase_view(&self, id: i32) -> Result<(), ApiError>;

    async fn purchase_test_view(&self, id: i32) -> Result<(), ApiError>;
}

/// [`AttemptsApi`] over HTTP.
#[derive(Clone)]
pub struct HttpAttemptsApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAttemptsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured client; `timeout_secs` is then ignored.
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response, ApiError> {
        let response = self.request(method.clone(), path).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status.as_u16(), &body);
        warn!(%method, path, status = status.as_u16(), %message, "Attempts API request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn command(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::POST, path).await.map(|_| ())
    }
}

#[async_trait]
impl AttemptsApi for HttpAttemptsApi {
    async fn attempt(&self, id: i32) -> Result<AttemptDetail, ApiError> {
        let body = self
            .send(Method::GET, &format!("attempts/{id}"))
            .await?
            .text()
            .await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn rerun(&self, id: i32) -> Result<(), ApiError> {
        self.command(&format!("attempts/{id}/rerun")).await
    }

    async fn purchase_view(&self, id: i32) -> Result<(), ApiError> {
        self.command(&format!("attempts/{id}/purchase-view")).await
    }

    async fn purchase_test_view(&self, id: i32) -> Result<(), ApiError> {
        self.command(&format!("attempts/{id}/purchase-test-view")).await
    }
}

/// Pull a readable message out of an error body.
///
/// Understands `{"detail": ...}` and `{"message": ...}`; otherwise uses the raw
/// body, or the status line when the body is empty.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}
