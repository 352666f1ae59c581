// Outbound client for the game API: builds the player URL, attaches the
// bearer credential and classifies upstream failures.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde_json::Value;

use crate::metrics;

/// Errors raised while talking to the game API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: Value },
    /// Upstream could not be reached, or the request timed out.
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Upstream answered 2xx with a body that is not JSON.
    #[error("upstream returned a malformed body: {0}")]
    InvalidBody(serde_json::Error),
    /// Configured base URL cannot carry a path.
    #[error("invalid upstream base url {0:?}")]
    InvalidBaseUrl(String),
}

impl UpstreamError {
    /// Label used for the `outcome` dimension of the upstream request counter.
    fn outcome_label(&self) -> String {
        match self {
            UpstreamError::Status { status, .. } => status.as_u16().to_string(),
            UpstreamError::Network(_) => "network_error".to_string(),
            UpstreamError::InvalidBody(_) => "invalid_body".to_string(),
            UpstreamError::InvalidBaseUrl(_) => "invalid_url".to_string(),
        }
    }
}

/// Strip at most one leading `#` from a player tag.
///
/// Returns `None` when nothing is left.
pub fn normalize_tag(raw: &str) -> Option<&str> {
    let tag = raw.strip_prefix('#').unwrap_or(raw);
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// HTTP client for the game API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| UpstreamError::InvalidBaseUrl(base_url.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// URL of the player resource for an already-normalized tag.
    ///
    /// The `#` is re-added and the whole segment percent-encoded, so
    /// `G9JVPPJ80` becomes `/v1/players/%23G9JVPPJ80`.
    pub fn player_url(&self, tag: &str) -> Url {
        let mut url = self.base_url.clone();
        let canonical = format!("#{tag}");
        // cannot_be_a_base was ruled out in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "players", canonical.as_str()]);
        }
        url
    }

    /// Fetch a player profile, returning the upstream JSON body untouched.
    pub async fn fetch_player(&self, tag: &str) -> Result<Bytes, UpstreamError> {
        let started = Instant::now();
        let result = self.send(tag).await;
        metrics::UPSTREAM_REQUEST_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(_) => "200".to_string(),
            Err(e) => e.outcome_label(),
        };
        metrics::UPSTREAM_REQUESTS_TOTAL
            .with_label_values(&[outcome.as_str()])
            .inc();
        result
    }

    async fn send(&self, tag: &str) -> Result<Bytes, UpstreamError> {
        let url = self.player_url(tag);
        tracing::debug!(%url, "requesting player from upstream");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: error_body(status, &body),
            });
        }

        serde_json::from_slice::<serde::de::IgnoredAny>(&body)
            .map_err(UpstreamError::InvalidBody)?;
        Ok(body)
    }
}

/// Decode an upstream error body: JSON when possible, raw text otherwise,
/// and the status reason when the body is empty.
fn error_body(status: StatusCode, body: &[u8]) -> Value {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return value;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        Value::String(
            status
                .canonical_reason()
                .unwrap_or("Upstream error")
                .to_string(),
        )
    } else {
        Value::String(text)
    }
}
