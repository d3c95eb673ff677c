use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use medischedule_chat::AppState;
use medischedule_chat::client::{ChatBackend, ChatRequest, SendError};
use medischedule_chat::config::{
    AppConfig, BackendConfig, LoggingConfig, ServerConfig, SessionConfig, UiConfig,
};
use tower::ServiceExt;

/// Backend that answers from a script and records every request.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, SendError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn with_replies(replies: impl IntoIterator<Item = Result<String, SendError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, SendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SendError::Protocol))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        backend: BackendConfig {
            base_url: "http://127.0.0.1:9".into(),
            chat_path: "/api/chat".into(),
            timeout_secs: 5,
        },
        ui: UiConfig {
            static_dir: "static".into(),
            toast_timeout_ms: 5000,
            placeholder: "Ask about appointments, clinic info, or anything else...".into(),
        },
        session: SessionConfig {
            idle_timeout_secs: 1800,
            system_prompt: None,
        },
        logging: LoggingConfig { json: false },
    }
}

pub fn test_state(backend: Arc<ScriptedBackend>) -> AppState {
    AppState::new(Arc::new(test_config()), backend)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let resp = app
        .oneshot(request)
        .await
        .expect("app should handle request");

    let status = resp.status();
    let body = to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("response body should be readable");
    let text = String::from_utf8(body.to_vec()).expect("response body must be utf-8");
    (status, text)
}

/// Send a GET request and return `(status, body_text)`.
pub async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request build should succeed");
    send(app, request).await
}

/// Send a bodiless POST request and return `(status, body_text)`.
pub async fn post(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request build should succeed");
    send(app, request).await
}

/// Submit the message form and return `(status, body_text)`.
pub async fn post_message(app: axum::Router, uri: &str, message: &str) -> (StatusCode, String) {
    let form = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("message", message)
        .finish();
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .expect("request build should succeed");
    send(app, request).await
}
