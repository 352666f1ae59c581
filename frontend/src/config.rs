// Client configuration, loaded from environment variables.

use std::time::Duration;

pub const DEFAULT_RELAY_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the relay, including its `/api` prefix.
    pub relay_base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Environment variables (a `.env` file is read first, if present):
    /// - `RELAY_BASE_URL` - relay base URL (default: `http://localhost:3001/api`)
    /// - `RELAY_TIMEOUT_SECS` - request timeout in seconds (default: 10)
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env(|key| std::env::var(key).ok())
    }

    fn from_env(env: impl Fn(&str) -> Option<String>) -> Self {
        let relay_base_url = env("RELAY_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RELAY_BASE_URL.to_string());
        let timeout_secs = env("RELAY_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECS);
        Self {
            relay_base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Config pointing at an explicit relay, with the default timeout.
    pub fn with_base_url(relay_base_url: impl Into<String>) -> Self {
        Self {
            relay_base_url: relay_base_url.into(),
            timeout: Duration::from_secs(DEFAULT_RELAY_TIMEOUT_SECS),
        }
    }
}
