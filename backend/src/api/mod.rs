// HTTP API routes: player relay, health and metrics.

use std::any::Any;

use axum::{
    extract::{rejection::PathRejection, Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::metrics;
use crate::upstream::{self, UpstreamClient, UpstreamError};

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

// ── Errors ────────────────────────────────────────────────────────────

/// Every failure of the relay resolves to one of these, and each renders as
/// a JSON `{ "error": ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("player tag is required")]
    EmptyTag,
    /// The tag segment could not be decoded (e.g. invalid UTF-8).
    #[error("malformed player tag: {0}")]
    MalformedTag(#[from] PathRejection),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

fn json_error(status: StatusCode, error: Value) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::EmptyTag => {
                json_error(StatusCode::BAD_REQUEST, json!("Player tag is required"))
            }
            RelayError::MalformedTag(rejection) => {
                tracing::warn!("Rejected player path: {rejection}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Something went wrong!"),
                )
            }
            RelayError::Upstream(UpstreamError::Status { status, body }) => {
                tracing::warn!("Upstream error {status}: {body}");
                json_error(status, body)
            }
            RelayError::Upstream(e) => {
                tracing::error!("Upstream failure: {e}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Internal server error"),
                )
            }
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/players/{player_tag}", get(get_player))
        .with_state(state);
    with_middleware(routes)
}

/// Wrap routes with the not-found and wrong-method fallbacks, panic recovery
/// and permissive CORS.
pub fn with_middleware(routes: Router) -> Router {
    routes
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn get_player(
    State(state): State<AppState>,
    player_tag: Result<Path<String>, PathRejection>,
) -> Result<Response, RelayError> {
    let Path(player_tag) = player_tag?;
    let tag = upstream::normalize_tag(&player_tag).ok_or(RelayError::EmptyTag)?;
    let body = state.upstream.fetch_player(tag).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "coc-relay" }))
}

async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, json!("Not found"))
}

async fn method_not_allowed() -> Response {
    json_error(StatusCode::METHOD_NOT_ALLOWED, json!("Method not allowed"))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {detail}");
    metrics::HANDLER_PANICS_TOTAL.inc();
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!("Something went wrong!"),
    )
}
