use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use medischedule_chat::client::{
    ChatBackend, ChatRequest, HttpChatBackend, SendError, WireMessage,
};
use medischedule_chat::session::Role;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// What the stub saw on its last request.
#[derive(Debug, Default)]
struct Seen {
    content_type: Option<String>,
    body: Option<Value>,
}

/// Answer `/api/chat` with `status` and `reply` on an ephemeral port. Returns the base URL.
async fn stub_backend(status: StatusCode, reply: Value, seen: Arc<Mutex<Seen>>) -> String {
    let app = Router::new().route(
        "/api/chat",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = Arc::clone(&seen);
            let reply = reply.clone();
            async move {
                let mut guard = seen.lock().unwrap();
                guard.content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                guard.body = Some(body);
                (status, Json(reply))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn backend(base_url: &str) -> HttpChatBackend {
    HttpChatBackend::new(base_url, "/api/chat", Duration::from_secs(5)).unwrap()
}

fn history() -> ChatRequest {
    ChatRequest {
        messages: vec![
            WireMessage {
                role: Role::Assistant,
                content: "How can I assist you today?".into(),
            },
            WireMessage {
                role: Role::User,
                content: "Book a physical exam".into(),
            },
        ],
    }
}

#[tokio::test]
async fn test_posts_history_and_returns_reply() {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let base = stub_backend(
        StatusCode::OK,
        json!({ "reply": "Your appointment is booked.", "state": { "step": 2 } }),
        Arc::clone(&seen),
    )
    .await;

    let reply = backend(&base).chat(&history()).await.unwrap();
    assert_eq!(reply, "Your appointment is booked.");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        seen.body,
        Some(json!({
            "messages": [
                { "role": "assistant", "content": "How can I assist you today?" },
                { "role": "user", "content": "Book a physical exam" }
            ]
        }))
    );
}

#[tokio::test]
async fn test_error_status_maps_to_network_error() {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let base = stub_backend(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "boom" }),
        seen,
    )
    .await;

    let err = backend(&base).chat(&history()).await.unwrap_err();
    match err {
        SendError::Network {
            status,
            status_text,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_reply_is_protocol_error() {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let base = stub_backend(StatusCode::OK, json!({}), seen).await;

    let err = backend(&base).chat(&history()).await.unwrap_err();
    assert!(matches!(err, SendError::Protocol));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}"))
        .chat(&history())
        .await
        .unwrap_err();
    assert!(matches!(err, SendError::Transport(_)));
    assert_eq!(
        err.user_message(),
        "Failed to send message. Please try again."
    );
}
