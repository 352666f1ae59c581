use tracing_subscriber::EnvFilter;

use coc_relay::api::{self, AppState};
use coc_relay::config::Config;
use coc_relay::metrics;
use coc_relay::upstream::UpstreamClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    if config.api_token.is_empty() {
        tracing::warn!("COC_API_TOKEN is not set; upstream calls will be rejected");
    }

    metrics::register_metrics();

    let upstream = UpstreamClient::new(
        &config.upstream_base_url,
        config.api_token.clone(),
        config.upstream_timeout,
    )
    .expect("Failed to build upstream client");

    let app = api::router(AppState { upstream });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    tracing::info!("Relay listening on http://localhost:{}", config.port);
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
