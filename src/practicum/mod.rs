use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{MalformedKind, WatchError};

/// One poll of the review API.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Fetch homework status changes since `from_date` (Unix seconds) and
    /// return the decoded body untouched.
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, WatchError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(token: String, endpoint: Url, timeout: Duration) -> Result<Self, WatchError> {
        let http = Client::builder()
            .user_agent("homework-watchbot/0.1")
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn build_request(&self, from_date: i64) -> Result<reqwest::Request, WatchError> {
        let from_date = effective_cursor(from_date);
        Ok(self
            .http
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()?)
    }
}

/// Non-positive cursors are not valid epoch values; poll from now instead.
pub fn effective_cursor(from_date: i64) -> i64 {
    if from_date > 0 {
        from_date
    } else {
        Utc::now().timestamp()
    }
}

/// Decode a response body. An empty body decodes to `null` so the validator
/// can report it as empty.
pub fn decode_body(raw: &str) -> Result<Value, WatchError> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw)
        .map_err(|err| WatchError::MalformedResponse(MalformedKind::NotJson(err.to_string())))
}

#[async_trait]
impl ReviewApi for PracticumClient {
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, WatchError> {
        let request = self.build_request(from_date)?;
        debug!(url = %request.url(), "polling review API");

        let res = self.http.execute(request).await?;
        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, %body, "review API error");
            return Err(WatchError::RemoteUnavailable { status });
        }

        let raw = res.text().await?;
        decode_body(&raw)
    }
}
