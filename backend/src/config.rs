// Relay configuration, loaded from environment variables and CLI flags.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.clashofclans.com";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer credential forwarded to the game API. Never validated locally;
    /// an empty token simply makes the upstream reject every call.
    pub api_token: String,
    /// Origin of the game API, without the `/v1` prefix.
    pub upstream_base_url: String,
    /// Timeout applied to every outbound upstream request.
    pub upstream_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// A `.env` file in the working directory is read first, if present.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 3001)
    /// - `COC_API_TOKEN` - bearer credential for the game API
    /// - `COC_API_BASE_URL` - upstream origin (default: `https://api.clashofclans.com`)
    /// - `UPSTREAM_TIMEOUT_SECS` - outbound timeout in seconds (default: 10)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Build a config from CLI args and an environment lookup.
    fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let api_token = env("COC_API_TOKEN").unwrap_or_default();

        let upstream_base_url = env("COC_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());

        let timeout_secs = env("UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Config {
            port,
            api_token,
            upstream_base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(args: &[&str], vars: &[(&str, &str)]) -> Config {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_sources(&args, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&["coc-relay"], &[]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.api_token, "");
        assert_eq!(config.upstream_base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_cli_port_overrides_env() {
        let config = load_with(&["coc-relay", "--port", "8080"], &[("PORT", "9000")]);
        assert_eq!(config.port, 8080);

        let config = load_with(&["coc-relay"], &[("PORT", "9000")]);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = load_with(
            &["coc-relay"],
            &[("PORT", "not-a-port"), ("UPSTREAM_TIMEOUT_SECS", "0")],
        );
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_token_and_base_url_from_env() {
        let config = load_with(
            &["coc-relay"],
            &[
                ("COC_API_TOKEN", "secret"),
                ("COC_API_BASE_URL", "http://127.0.0.1:9999"),
            ],
        );
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.upstream_base_url, "http://127.0.0.1:9999");
    }
}
