// HTTP client for the relay service.
//
// Strips a leading `#` from the tag (the relay re-adds it) and turns the
// relay's `{ "error": ... }` envelope into a readable message.

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::profile::PlayerProfile;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The relay answered with a non-success status.
    #[error("{message}")]
    Relay { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Unexpected response from relay: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("Invalid relay base URL {0:?}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// HTTP status the relay answered with, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Relay { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Remove one leading `#`, if present.
pub fn strip_tag(tag: &str) -> &str {
    tag.strip_prefix('#').unwrap_or(tag)
}

pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;
        let client = Self {
            http,
            base_url: config.relay_base_url.clone(),
        };
        // Fail at construction rather than on the first search.
        client.player_url("X")?;
        Ok(client)
    }

    /// `{base}/players/{tag}` with the tag as a single encoded path segment.
    pub fn player_url(&self, tag: &str) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["players", strip_tag(tag)]);
        Ok(url)
    }

    pub async fn get_player(&self, tag: &str) -> Result<PlayerProfile, ClientError> {
        let url = self.player_url(tag)?;
        debug!(%url, "fetching player from relay");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        if status.is_success() {
            return response.json::<PlayerProfile>().await.map_err(ClientError::Decode);
        }

        // The envelope is best-effort: a proxy in front of the relay may
        // answer with something else entirely.
        let envelope = response.json::<Value>().await.ok();
        let message = envelope
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(error_message)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "relay returned an error");
        Err(ClientError::Relay {
            status: status.as_u16(),
            message,
        })
    }
}

/// Readable message for the `error` field of a relay envelope.
///
/// Strings are used as-is; game API error objects carry a `message` and/or a
/// `reason`. For a 403 `{"reason":"accessDenied"}` this yields `accessDenied`
/// rather than the generic `Request failed with status code 403`, which is
/// only used when the relay sent no usable envelope.
fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["message", "reason"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| Some(error.to_string())),
        other => Some(other.to_string()),
    }
}
