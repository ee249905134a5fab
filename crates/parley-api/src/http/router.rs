//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing.

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete gateway router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/sessions/{session_id}/history",
            get(handlers::session::history),
        )
        .route("/sessions/{session_id}", delete(handlers::session::clear))
        .route(
            "/webhook/messenger",
            get(handlers::messenger::verify).post(handlers::messenger::receive),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / — service information.
async fn service_info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "Parley Chat Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// GET /health — simple health check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    use parley_core::agent::{AgentRuntime, BoxAgentRuntime};
    use parley_core::delivery::{BoxReplyDelivery, ReplyDelivery};
    use parley_infra::checkpoint::{CheckpointStore, MemoryCheckpointStore};
    use parley_types::config::GatewayConfig;
    use parley_types::error::{AgentError, DeliveryError};
    use parley_types::thread::ThreadId;
    use parley_types::turn::Turn;
    use std::sync::Arc;

    /// Scripted runtime: replies "pong:<text>" and reports context size.
    struct ScriptedAgent;

    impl AgentRuntime for ScriptedAgent {
        async fn reply(
            &self,
            _thread: &ThreadId,
            history: &[Turn],
            user_text: &str,
        ) -> Result<String, AgentError> {
            Ok(format!("pong[{}]:{user_text}", history.len()))
        }
    }

    struct FailingAgent;

    impl AgentRuntime for FailingAgent {
        async fn reply(
            &self,
            _thread: &ThreadId,
            _history: &[Turn],
            _user_text: &str,
        ) -> Result<String, AgentError> {
            Err(AgentError::Provider("boom".to_string()))
        }
    }

    /// Records delivered (psid, text) pairs.
    #[derive(Default)]
    struct RecordingDelivery {
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ReplyDelivery for RecordingDelivery {
        async fn deliver(&self, psid: &str, text: &str) -> Result<(), DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((psid.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn test_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.messenger.verify_token = "test-token".to_string();
        config
    }

    fn test_app() -> Router {
        let state = AppState::new(
            CheckpointStore::Memory(MemoryCheckpointStore::new()),
            BoxAgentRuntime::new(ScriptedAgent),
            BoxReplyDelivery::new(RecordingDelivery::default()),
            &test_config(),
        );
        build_router(state)
    }

    fn app_with_recorder() -> (Router, Arc<Mutex<Vec<(String, String)>>>) {
        let recorder = RecordingDelivery::default();
        let sent = Arc::clone(&recorder.sent);
        let state = AppState::new(
            CheckpointStore::Memory(MemoryCheckpointStore::new()),
            BoxAgentRuntime::new(ScriptedAgent),
            BoxReplyDelivery::new(recorder),
            &test_config(),
        );
        (build_router(state), sent)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_chat_mints_and_reuses_session_id() {
        let app = test_app();

        // No session_id: one is minted.
        let resp = app
            .clone()
            .oneshot(json_request(Method::POST, "/chat", json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "pong[0]:hi");
        let sid = body["session_id"].as_str().unwrap().to_string();
        assert!(sid.starts_with("api_session_"));

        // Same session_id continues the same thread: context grows.
        let resp = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/chat",
                json!({"message": "more", "session_id": sid}),
            ))
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["message"], "pong[2]:more");
        assert_eq!(body["session_id"].as_str().unwrap(), sid);

        // History shows the merged exchange in order.
        let resp = app
            .oneshot(
                Request::get(format!("/sessions/{sid}/history"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["message_count"], 4);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][2]["content"], "more");
    }

    #[tokio::test]
    async fn test_chat_distinct_callers_get_distinct_ids() {
        let app = test_app();

        let mut ids = std::collections::HashSet::new();
        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(json_request(Method::POST, "/chat", json!({"message": "hi"})))
                .await
                .unwrap();
            let body = body_json(resp).await;
            ids.insert(body["session_id"].as_str().unwrap().to_string());
        }
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_empty_message_is_400() {
        let app = test_app();
        let resp = app
            .oneshot(json_request(Method::POST, "/chat", json!({"message": "  "})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_chat_agent_failure_is_generic_502() {
        let state = AppState::new(
            CheckpointStore::Memory(MemoryCheckpointStore::new()),
            BoxAgentRuntime::new(FailingAgent),
            BoxReplyDelivery::new(RecordingDelivery::default()),
            &test_config(),
        );
        let app = build_router(state);

        let resp = app
            .oneshot(json_request(Method::POST, "/chat", json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        // Internal detail must not leak.
        assert!(!body["message"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_history_unknown_session_is_empty_success() {
        let app = test_app();
        let resp = app
            .oneshot(
                Request::get("/sessions/never_used_id/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message_count"], 0);
        assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent_over_http() {
        let app = test_app();

        let resp = app
            .clone()
            .oneshot(json_request(Method::POST, "/chat", json!({"message": "hi"})))
            .await
            .unwrap();
        let sid = body_json(resp).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(
                    Request::delete(format!("/sessions/{sid}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let body = body_json(resp).await;
            assert_eq!(body["success"], true);
            assert_eq!(body["session_id"].as_str().unwrap(), sid);
        }

        let resp = app
            .oneshot(
                Request::get(format!("/sessions/{sid}/history"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["message_count"], 0);
    }

    #[tokio::test]
    async fn test_webhook_verification_handshake() {
        let app = test_app();

        let resp = app
            .clone()
            .oneshot(
                Request::get(
                    "/webhook/messenger?hub.mode=subscribe&hub.verify_token=test-token&hub.challenge=12345",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"12345");

        let resp = app
            .oneshot(
                Request::get(
                    "/webhook/messenger?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=12345",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    fn messenger_event(psid: &str, text: &str) -> Value {
        json!({
            "object": "page",
            "entry": [{
                "messaging": [{
                    "sender": { "id": psid },
                    "message": { "text": text }
                }]
            }]
        })
    }

    #[tokio::test]
    async fn test_webhook_routes_to_deterministic_thread() {
        let (app, sent) = app_with_recorder();

        // Two deliveries from one end-user merge into one thread.
        for text in ["hello", "again"] {
            let resp = app
                .clone()
                .oneshot(json_request(
                    Method::POST,
                    "/webhook/messenger",
                    messenger_event("1000", text),
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(body_json(resp).await["status"], "ok");
        }

        // Replies went out to the same PSID; the second call saw the
        // first exchange as context.
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ("1000".to_string(), "pong[0]:hello".to_string()));
        assert_eq!(sent[1], ("1000".to_string(), "pong[2]:again".to_string()));

        // And the merged history is visible under messenger_<psid>.
        drop(sent);
        let resp = app
            .oneshot(
                Request::get("/sessions/messenger_1000/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["message_count"], 4);
    }

    #[tokio::test]
    async fn test_webhook_skips_echo_and_non_text() {
        let (app, sent) = app_with_recorder();

        let payload = json!({
            "object": "page",
            "entry": [{
                "messaging": [
                    { "sender": { "id": "1" }, "message": { "text": "hi", "is_echo": true } },
                    { "sender": { "id": "2" }, "message": { "attachments": [] } },
                    { "message": { "text": "no sender" } }
                ]
            }]
        });

        let resp = app
            .oneshot(json_request(Method::POST, "/webhook/messenger", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_ignores_non_page_objects() {
        let app = test_app();
        let resp = app
            .oneshot(json_request(
                Method::POST,
                "/webhook/messenger",
                json!({"object": "instagram", "entry": []}),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["status"], "ignored");
    }
}
