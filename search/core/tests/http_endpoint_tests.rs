//! HTTP endpoint tests against a local search server
//!
//! Each test binds an axum router on an ephemeral port and points an
//! [`HttpSearchEndpoint`] at it, so the real reqwest path is exercised:
//! - request shape (`POST /search`, `{"query": ...}`)
//! - response decoding, including a missing `results` field
//! - non-2xx statuses, malformed bodies and timeouts

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

use neurosearch_core::{
    DisclosurePolicy, Dispatcher, EndpointError, HttpSearchEndpoint, SearchEndpoint,
    SearchRequest, FAILURE_CONTENT, FOUND_CONTENT, NO_RESULTS_CONTENT,
};

// =============================================================================
// Test Server
// =============================================================================

type Captured = Arc<Mutex<Vec<Value>>>;

/// Serve a router on 127.0.0.1 and return its base URL
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A server that records request bodies and answers with a fixed JSON body
async fn json_server(reply: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route(
            "/search",
            post(
                move |State(captured): State<Captured>, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        captured.lock().unwrap().push(body);
                        Json(reply)
                    }
                },
            ),
        )
        .with_state(captured.clone());
    (serve(router).await, captured)
}

fn endpoint(base_url: &str) -> HttpSearchEndpoint {
    assert_ok!(HttpSearchEndpoint::new(base_url, Duration::from_secs(5)))
}

// =============================================================================
// Request / Response
// =============================================================================

#[tokio::test]
async fn test_posts_query_and_decodes_results() {
    let (base, captured) = json_server(json!({
        "message": "Here's what I found:",
        "results": [
            {"score": 0.9, "id": "d1", "title": "Cat Facts", "type": "article", "url": "https://x"}
        ],
        "more": []
    }))
    .await;

    let response = assert_ok!(endpoint(&base).search(&SearchRequest::new("cats")).await);

    assert_eq!(captured.lock().unwrap().as_slice(), &[json!({"query": "cats"})]);
    let results = response.into_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Cat Facts");
    assert_eq!(results[0].kind, "article");
    assert_eq!(results[0].url, "https://x");
}

#[tokio::test]
async fn test_trailing_slash_base_url() {
    let (base, captured) = json_server(json!({"results": []})).await;

    let endpoint = endpoint(&format!("{base}/"));
    assert_ok!(endpoint.search(&SearchRequest::new("owls")).await);

    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_results_field() {
    let (base, _) = json_server(json!({"message": "nothing"})).await;

    let response = assert_ok!(endpoint(&base).search(&SearchRequest::new("x")).await);
    assert!(response.results().is_empty());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_non_success_status() {
    let router = Router::new().route(
        "/search",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "index offline") }),
    );
    let base = serve(router).await;

    let err = assert_err!(endpoint(&base).search(&SearchRequest::new("cats")).await);
    match err {
        EndpointError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "index offline");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let router = Router::new().route("/search", post(|| async { "definitely not json" }));
    let base = serve(router).await;

    let err = assert_err!(endpoint(&base).search(&SearchRequest::new("cats")).await);
    assert!(matches!(err, EndpointError::Decode(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let router = Router::new().route(
        "/search",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"results": []}))
        }),
    );
    let base = serve(router).await;

    let endpoint = assert_ok!(HttpSearchEndpoint::new(&base, Duration::from_millis(100)));
    let err = assert_err!(endpoint.search(&SearchRequest::new("slow")).await);
    assert!(matches!(err, EndpointError::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_server() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = assert_err!(
        endpoint(&format!("http://{addr}"))
            .search(&SearchRequest::new("cats"))
            .await
    );
    assert!(matches!(err, EndpointError::Transport(_)));
}

// =============================================================================
// Through the Dispatcher
// =============================================================================

#[tokio::test]
async fn test_dispatcher_over_http() {
    let (base, _) = json_server(json!({
        "results": [{"title": "Cat Facts", "type": "article", "url": "https://x"}]
    }))
    .await;
    let mut dispatcher = Dispatcher::new(endpoint(&base), DisclosurePolicy::Shared);

    dispatcher.submit_and_settle("cats").await;

    let transcript = dispatcher.session().transcript();
    assert_eq!(transcript[1].content, FOUND_CONTENT);
    assert_eq!(transcript[1].document_count(), 1);
}

#[tokio::test]
async fn test_dispatcher_over_http_empty_and_failure() {
    let (base, _) = json_server(json!({"results": []})).await;
    let mut dispatcher = Dispatcher::new(endpoint(&base), DisclosurePolicy::Shared);
    dispatcher.submit_and_settle("asdkjh").await;
    assert_eq!(dispatcher.session().transcript()[1].content, NO_RESULTS_CONTENT);

    let router = Router::new().route(
        "/search",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = serve(router).await;
    let mut dispatcher = Dispatcher::new(endpoint(&base), DisclosurePolicy::Shared);
    dispatcher.submit_and_settle("fail me").await;
    assert_eq!(dispatcher.session().transcript()[1].content, FAILURE_CONTENT);
    assert!(!dispatcher.is_pending());
}
