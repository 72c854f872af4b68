use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use explain_proxy::{
    build_app,
    gateway::{Completer, UpstreamError},
    AppState,
};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Records prompts and replays a canned outcome.
struct StubCompleter {
    reply: fn() -> Result<Option<String>, UpstreamError>,
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Completer for StubCompleter {
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>, UpstreamError> {
        self.seen
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        (self.reply)()
    }
}

fn stub_app(
    reply: fn() -> Result<Option<String>, UpstreamError>,
) -> (axum::Router, Arc<Mutex<Vec<(String, String)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = build_app(AppState::new(StubCompleter {
        reply,
        seen: seen.clone(),
    }));
    (app, seen)
}

async fn post(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn stubbed_completion_is_returned_verbatim() {
    let (app, seen) = stub_app(|| Ok(Some("Prints 1.".to_string())));

    let (status, body) = post(app, json!({ "code": "print(1)", "language": "python" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "explanation": "Prints 1." }));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.contains("python"));
    assert_eq!(seen[0].1, "Explain this python code:\n\n```python\nprint(1)\n```");
}

#[tokio::test]
async fn no_content_falls_back() {
    let (app, _) = stub_app(|| Ok(None));

    let (status, body) = post(app, json!({ "code": "print(1)" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "explanation": "Unable to generate explanation." }));
}

#[tokio::test]
async fn empty_code_never_reaches_completer() {
    let (app, seen) = stub_app(|| Ok(Some("unused".to_string())));

    let (status, body) = post(app, json!({ "code": "", "language": "js" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Code is required" }));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn classified_upstream_errors_map_to_statuses() {
    let cases: [(fn() -> Result<Option<String>, UpstreamError>, StatusCode); 4] = [
        (|| Err(UpstreamError::RateLimited), StatusCode::TOO_MANY_REQUESTS),
        (|| Err(UpstreamError::CreditsExhausted), StatusCode::PAYMENT_REQUIRED),
        (
            || Err(UpstreamError::Status(StatusCode::BAD_GATEWAY)),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (|| Err(UpstreamError::Timeout(30_000)), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (reply, expected) in cases {
        let (app, _) = stub_app(reply);
        let (status, body) = post(app, json!({ "code": "x" })).await;
        assert_eq!(status, expected);
        assert!(body["error"].is_string());
    }
}
