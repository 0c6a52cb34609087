use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lex_chat::config::AppConfig;
use lex_chat::kernel::SlotCatalog;
use lex_chat::server::{build_router, AppState};
use lex_chat::services::lex::Recognizer;
use lex_chat::services::llm::OnPremClient;
use lex_chat::services::suggestions::SuggestionProvider;
use lex_chat::services::ServiceError;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Replays a fixed RecognizeText body and records the session ids it saw.
struct StubRecognizer {
    body: Value,
    sessions: Mutex<Vec<String>>,
}

#[async_trait]
impl Recognizer for StubRecognizer {
    async fn recognize(&self, _text: &str, session_id: &str) -> Result<Value, ServiceError> {
        if let Ok(mut seen) = self.sessions.lock() {
            seen.push(session_id.to_string());
        }
        Ok(self.body.clone())
    }
}

fn elicit_branch() -> Value {
    json!({
        "messages": [{ "contentType": "PlainText", "content": "어느 지점으로 예약할까요?" }],
        "sessionState": {
            "dialogAction": { "type": "ElicitSlot", "slotToElicit": "Branch" },
            "intent": { "name": "MakeReservation", "state": "InProgress", "slots": { "Branch": null } }
        }
    })
}

fn state(recognizer: Option<Arc<StubRecognizer>>, region: Option<&str>) -> AppState {
    let branches = (1..=10).map(|i| format!("지점{}", i)).collect::<Vec<_>>().join(",");
    let config = AppConfig::from_lookup(|key| match key {
        "BRANCH_VALUES" => Some(branches.clone()),
        "ENABLED_AI_ENGINES" => Some("aws-lex,ollama".to_string()),
        _ => None,
    });

    AppState {
        catalog: Arc::new(SlotCatalog::reservation()),
        recognizer: recognizer.map(|r| r as Arc<dyn Recognizer>),
        suggestions: Arc::new(SuggestionProvider::new(&config.suggestions, None)),
        engines: Arc::new(OnPremClient::new(config.engines)),
        region: region.map(str::to_string),
    }
}

fn app(state: AppState) -> Router {
    build_router(state, Path::new("public"))
}

fn post_chat(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(state(None, None))
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "ok": true }));
}

#[tokio::test]
async fn test_engines_listing() {
    let response = app(state(None, None))
        .oneshot(Request::builder().uri("/api/engines").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["defaultEngine"], json!("aws-lex"));
    let keys: Vec<_> = body["engines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["aws-lex", "ollama"]);
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let response = app(state(None, None))
        .oneshot(post_chat(json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "text is required" }));
}

#[tokio::test]
async fn test_disabled_engine_is_rejected() {
    let response = app(state(None, None))
        .oneshot(post_chat(json!({ "text": "hi", "engine": "openai-compatible" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        json!("engine is not enabled: openai-compatible")
    );
}

#[tokio::test]
async fn test_lex_turn_with_quick_replies_and_cookie() {
    let recognizer = Arc::new(StubRecognizer {
        body: elicit_branch(),
        sessions: Mutex::new(Vec::new()),
    });
    let response = app(state(Some(recognizer.clone()), Some("ap-northeast-2")))
        .oneshot(post_chat(json!({ "text": "예약하고 싶어요", "sessionId": "web-fixed" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(cookie, "lex_session_id=web-fixed; Path=/; SameSite=Lax");

    let body = json_body(response).await;
    assert_eq!(body["sessionId"], json!("web-fixed"));
    assert_eq!(body["ui"]["mode"], json!("elicit_slot"));
    assert_eq!(body["ui"]["prompt"], json!("어느 지점으로 예약할까요?"));
    assert_eq!(body["ui"]["quickReplies"].as_array().map(Vec::len), Some(8));
    assert_eq!(body["ui"]["quickReplies"][0], json!("지점1"));
    assert_eq!(body["summary"].as_array().map(Vec::len), Some(7));

    assert_eq!(recognizer.sessions.lock().unwrap().as_slice(), ["web-fixed".to_string()]);
}

#[tokio::test]
async fn test_session_from_cookie() {
    let recognizer = Arc::new(StubRecognizer {
        body: elicit_branch(),
        sessions: Mutex::new(Vec::new()),
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, "lex_session_id=web-cookie01")
        .body(Body::from(json!({ "text": "안녕" }).to_string()))
        .unwrap();

    let response = app(state(Some(recognizer.clone()), None)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["sessionId"], json!("web-cookie01"));
}

#[tokio::test]
async fn test_unconfigured_lex_reports_hint() {
    let response = app(state(None, None))
        .oneshot(post_chat(json!({ "text": "hi" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("not configured"));
    assert!(body["hint"].as_str().unwrap().contains("LEX_BOT_ID"));
}

#[tokio::test]
async fn test_suggestions_endpoint() {
    let missing_region = app(state(None, None))
        .oneshot(Request::builder().uri("/api/suggestions?slot=Branch").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing_region.status(), StatusCode::BAD_REQUEST);

    let response = app(state(None, Some("ap-northeast-2")))
        .oneshot(Request::builder().uri("/api/suggestions?slot=Branch").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["slot"], json!("Branch"));
    assert_eq!(body["suggestions"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn test_fulfillment_endpoint() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/fulfillment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "sessionState": { "intent": { "name": "Help", "slots": {} } } }).to_string(),
        ))
        .unwrap();

    let response = app(state(None, None)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sessionState"]["intent"]["state"], json!("Fulfilled"));
    assert_eq!(body["sessionState"]["dialogAction"]["type"], json!("Close"));
}

#[tokio::test]
async fn test_session_id_cannot_inject_cookie_attributes() {
    let recognizer = Arc::new(StubRecognizer {
        body: elicit_branch(),
        sessions: Mutex::new(Vec::new()),
    });
    let response = app(state(Some(recognizer.clone()), None))
        .oneshot(post_chat(json!({ "text": "안녕", "sessionId": "a b; Domain=evil.example" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(
        cookie,
        "lex_session_id=a%20b%3B%20Domain%3Devil.example; Path=/; SameSite=Lax"
    );
    assert_eq!(
        recognizer.sessions.lock().unwrap().as_slice(),
        ["a b; Domain=evil.example".to_string()]
    );
}

#[tokio::test]
async fn test_encoded_cookie_round_trips() {
    let recognizer = Arc::new(StubRecognizer {
        body: elicit_branch(),
        sessions: Mutex::new(Vec::new()),
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, "lex_session_id=a%20b%3Bc")
        .body(Body::from(json!({ "text": "안녕" }).to_string()))
        .unwrap();

    let response = app(state(Some(recognizer), None)).oneshot(request).await.unwrap();
    assert_eq!(json_body(response).await["sessionId"], json!("a b;c"));
}

#[tokio::test]
async fn test_malformed_json_gets_error_shape() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(state(None, None)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
    let body = json_body(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_shutdown_only_on_delivered_signal() {
    let token = tokio_util::sync::CancellationToken::new();

    lex_chat::server::cancel_on_signal(
        async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler")) },
        token.clone(),
    )
    .await;
    assert!(!token.is_cancelled());

    lex_chat::server::cancel_on_signal(async { Ok(()) }, token.clone()).await;
    assert!(token.is_cancelled());
}
