// End-to-end search tests: client session -> relay -> fake game API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use coc_relay::api::{self, AppState};
use coc_relay::upstream::UpstreamClient;
use coc_stats::config::ClientConfig;
use coc_stats::relay_client::RelayClient;
use coc_stats::render::{build_view, render_session};
use coc_stats::session::{Session, EMPTY_TAG_MESSAGE};

#[derive(Clone)]
struct FakeApi {
    status: StatusCode,
    body: &'static str,
    paths: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
}

async fn answer(State(fake): State<FakeApi>, uri: Uri) -> Response {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    fake.paths.lock().unwrap().push(uri.path().to_string());
    (fake.status, fake.body).into_response()
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct Stack {
    client: RelayClient,
    upstream: FakeApi,
}

/// Fake game API behind a real relay, and a client pointed at the relay.
async fn stack(status: StatusCode, body: &'static str) -> Stack {
    let upstream = FakeApi {
        status,
        body,
        paths: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let upstream_url = serve(Router::new().fallback(answer).with_state(upstream.clone())).await;

    let relay = api::router(AppState {
        upstream: UpstreamClient::new(&upstream_url, "token".into(), Duration::from_secs(2))
            .unwrap(),
    });
    let relay_url = serve(relay).await;

    let client = RelayClient::new(&ClientConfig::with_base_url(format!("{relay_url}/api"))).unwrap();
    Stack { client, upstream }
}

const ASH: &str = r##"{
    "name": "Ash",
    "tag": "#G9JVPPJ80",
    "townHallLevel": 15,
    "troops": [{ "name": "Barbarian", "level": 9, "maxLevel": 11, "village": "home" }]
}"##;

#[tokio::test]
async fn scenario_plain_tag_renders_home_troop_card() {
    let stack = stack(StatusCode::OK, ASH).await;
    let mut session = Session::new();

    session.search(&stack.client, "G9JVPPJ80").await;

    assert_eq!(
        stack.upstream.paths.lock().unwrap().as_slice(),
        ["/v1/players/%23G9JVPPJ80"]
    );
    assert!(session.error.is_empty());
    assert!(!session.loading);

    let view = build_view(session.profile.as_ref().unwrap());
    let troops = &view.home_army[0];
    assert_eq!(troops.cards.len(), 1);
    assert_eq!(troops.cards[0].name, "Barbarian");
    assert_eq!(troops.cards[0].level, "Level: 9");
    assert_eq!(troops.cards[0].max.as_deref(), Some("Max: 11"));
    assert!(view.builder_army[0].cards.is_empty());
}

#[tokio::test]
async fn hash_prefixed_tag_round_trips_once_encoded() {
    let stack = stack(StatusCode::OK, ASH).await;
    let mut session = Session::new();

    session.search(&stack.client, "#ABC123").await;

    assert_eq!(
        stack.upstream.paths.lock().unwrap().as_slice(),
        ["/v1/players/%23ABC123"]
    );
}

#[tokio::test]
async fn scenario_access_denied_shows_error_and_no_profile() {
    let stack = stack(StatusCode::FORBIDDEN, r#"{"reason":"accessDenied"}"#).await;
    let mut session = Session::new();

    session.search(&stack.client, "G9JVPPJ80").await;

    assert_eq!(session.error, "accessDenied");
    assert!(session.profile.is_none());
    assert!(!session.loading);
    assert_eq!(render_session(&session), "Error: accessDenied\n");
}

#[tokio::test]
async fn not_found_replaces_previous_profile() {
    let stack = stack(StatusCode::OK, ASH).await;
    let mut session = Session::new();
    session.search(&stack.client, "G9JVPPJ80").await;
    assert!(session.profile.is_some());

    let missing = self::stack(StatusCode::NOT_FOUND, r#"{"reason":"notFound"}"#).await;
    session.search(&missing.client, "NOPE").await;

    assert_eq!(session.error, "notFound");
    assert!(session.profile.is_none());
}

#[tokio::test]
async fn empty_tag_makes_no_request() {
    let stack = stack(StatusCode::OK, ASH).await;
    let mut session = Session::new();

    session.search(&stack.client, "").await;

    assert_eq!(stack.upstream.hits.load(Ordering::SeqCst), 0);
    assert_eq!(session.error, EMPTY_TAG_MESSAGE);
    assert!(session.profile.is_none());
}

#[tokio::test]
async fn unreachable_relay_sets_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RelayClient::new(&ClientConfig::with_base_url(format!("http://{addr}/api"))).unwrap();
    let mut session = Session::new();
    session.search(&client, "G9JVPPJ80").await;

    assert!(session.error.starts_with("Network error"));
    assert!(!session.loading);
}
