//! Axum router configuration with middleware.
//!
//! Routes: `POST /api/chat`, `GET /health`, and -- when the static directory
//! exists -- `GET /` (index.html) plus `/static/*`.
//! Middleware: body size guard, CORS, request tracing.

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use chatrelay_types::config::ServerConfig;

use crate::http::{handlers, limit};
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/health", get(health_check));

    if server.static_dir.is_dir() {
        let index = server.static_dir.join("index.html");
        router = router
            .route_service("/", ServeFile::new(index))
            .nest_service("/static", ServeDir::new(&server.static_dir));
        tracing::info!(path = %server.static_dir.display(), "static file serving enabled");
    } else {
        tracing::warn!(
            path = %server.static_dir.display(),
            "static directory not found; serving API only"
        );
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            server.max_body_bytes,
            limit::limit_request_size,
        ))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

/// GET /health - liveness, active provider, and the number of live sessions.
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.chat_service.provider_name(),
        "sessions": state.store.len(),
    }))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use chatrelay_core::llm::box_provider::BoxChatProvider;
    use chatrelay_core::llm::provider::ChatProvider;
    use chatrelay_core::session::store::SessionStore;
    use chatrelay_infra::prompt::FilePromptSource;
    use chatrelay_types::chat::{Role, Turn};
    use chatrelay_types::error::UpstreamError;

    use super::*;

    /// Replies with the number of turns it received and the last user message.
    struct CountingEcho;

    impl ChatProvider for CountingEcho {
        fn name(&self) -> &str {
            "counting-echo"
        }

        async fn send(&self, messages: &[Turn]) -> Result<String, UpstreamError> {
            let last = messages
                .iter()
                .rev()
                .find(|t| t.role == Role::User)
                .map(|t| t.content.as_str())
                .unwrap_or_default();
            Ok(format!("echo({}): {last}", messages.len()))
        }
    }

    fn test_server_config(static_dir: PathBuf) -> ServerConfig {
        ServerConfig {
            max_body_bytes: 1024,
            static_dir,
            ..ServerConfig::default()
        }
    }

    fn test_app(static_dir: PathBuf) -> (Router, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new(Duration::from_secs(1800), 20));
        let state = AppState::new(
            Arc::clone(&store),
            BoxChatProvider::new(CountingEcho),
            FilePromptSource::new(Some("test prompt".to_string()), "unused.txt"),
        );
        (build_router(state, &test_server_config(static_dir)), store)
    }

    fn api_app() -> (Router, Arc<SessionStore>) {
        test_app(PathBuf::from("/no/such/static/dir"))
    }

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn chat_generates_session_and_replies() {
        let (app, store) = api_app();
        let response = app.oneshot(chat_request(json!({"message": "hello"}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["reply"], "echo(2): hello");
        let session_id = body["session_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(session_id).is_ok());
        assert_eq!(store.read(session_id).len(), 2);
    }

    #[tokio::test]
    async fn chat_feeds_history_back_for_same_session() {
        let (app, _) = api_app();
        let first = app
            .clone()
            .oneshot(chat_request(json!({"message": "one", "session_id": "abc"})))
            .await
            .unwrap();
        assert_eq!(json_body(first).await["reply"], "echo(2): one");

        let second = app
            .oneshot(chat_request(json!({"message": "two", "session_id": "abc"})))
            .await
            .unwrap();
        let body = json_body(second).await;
        assert_eq!(body["session_id"], "abc");
        // system + user/assistant from the first exchange + new user turn
        assert_eq!(body["reply"], "echo(4): two");
    }

    #[tokio::test]
    async fn chat_rejects_empty_message() {
        let (app, store) = api_app();
        let response = app.oneshot(chat_request(json!({"message": ""}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "Message is required.");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_non_string_message() {
        let (app, _) = api_app();
        let response = app.oneshot(chat_request(json!({"message": 7}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_rejects_malformed_json() {
        let (app, _) = api_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn oversized_request_is_rejected_before_handler() {
        let (app, store) = api_app();
        let big = "x".repeat(2048);
        let body = json!({"message": big}).to_string();
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .header("content-length", body.len().to_string())
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["detail"], "Request body too large.");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn declared_length_over_limit_is_rejected_even_with_small_body() {
        let (app, store) = api_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .header("content-length", "4096")
            .body(Body::from(json!({"message": "hi"}).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["detail"], "Request body too large.");
        // The handler never ran, so no session was created.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn declared_length_guard_covers_every_route() {
        let (app, _) = api_app();
        let request = Request::builder()
            .uri("/health")
            .header("content-length", "4096")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn body_without_length_is_capped_while_reading() {
        let (app, store) = api_app();
        let body = json!({"message": "x".repeat(2048)}).to_string();
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        assert!(request.headers().get("content-length").is_none());

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["detail"], "Request body too large.");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn health_reports_session_count() {
        let (app, store) = api_app();
        store.append("s1", Role::User, "hi");

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "counting-echo");
        assert_eq!(body["sessions"], 1);
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let (app, _) = api_app();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/chat")
            .header("origin", "http://localhost:8080")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            response.headers().get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn cors_ignores_unknown_origin() {
        let (app, _) = api_app();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/chat")
            .header("origin", "https://evil.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn serves_index_from_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>chat</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();
        let (app, _) = test_app(dir.path().to_path_buf());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>chat</h1>");

        let response = app
            .oneshot(Request::builder().uri("/static/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
