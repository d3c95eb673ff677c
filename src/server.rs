use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::client::{HttpChatBackend, SendError};
use crate::config::AppConfig;
use crate::session::{QuickAction, SendTicket, SessionHandle, SessionStore};
use crate::ui::{ChatInput, ChatInterfaceView, Toast, render_index};

/// How often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend = HttpChatBackend::new(
        &config.backend.base_url,
        &config.backend.chat_path,
        Duration::from_secs(config.backend.timeout_secs),
    )?;

    info!(
        name: "backend.config.loaded",
        endpoint = %backend.endpoint(),
        timeout_secs = config.backend.timeout_secs,
        "Chat backend configured"
    );

    let state = AppState::new(Arc::clone(&config), Arc::new(backend));

    spawn_session_sweeper(
        state.sessions.clone(),
        Duration::from_secs(config.session.idle_timeout_secs),
    );

    let app = router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.ui.static_dir);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/chat/{session_id}", get(interface_handler))
        .route("/chat/{session_id}/messages", post(message_handler))
        .route("/chat/{session_id}/quick/{index}", post(quick_action_handler))
        .route("/chat/{session_id}/reply", post(reply_handler))
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn spawn_session_sweeper(sessions: SessionStore, idle_timeout: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired_with_timeout(idle_timeout);
            if removed > 0 {
                info!(
                    name: "session.expired",
                    removed,
                    remaining = sessions.len(),
                    "Idle sessions removed"
                );
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Start a session and render the page around it.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let handle = state.sessions.create();
    info!(name: "session.created", session_id = %handle.id(), "Chat session created");

    let session = handle.snapshot();
    Html(render_index(&ChatInterfaceView {
        session: &session,
        session_id: handle.id(),
        placeholder: &state.config.ui.placeholder,
    }))
}

/// GET /chat/:id - Current interface fragment.
async fn interface_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session_id)?;
    Ok(Html(render_interface(&state, &handle)))
}

/// Form body of the message input.
#[derive(Debug, Deserialize)]
struct SendForm {
    #[serde(default)]
    message: String,
}

/// POST /chat/:id/messages - Submit the typed message.
async fn message_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Form(form): Form<SendForm>,
) -> Result<Response, StatusCode> {
    let handle = lookup(&state, &session_id)?;

    // Submit rule and gate are checked under one lock.
    let outcome = handle.with(|s| {
        let awaiting = s.awaiting_reply();
        let mut input = ChatInput::default()
            .with_draft(form.message)
            .with_disabled(awaiting);
        match input.submit() {
            Some(text) => Some(s.begin_send(text)),
            None if awaiting => Some(Err(SendError::Busy)),
            None => None,
        }
    });

    Ok(match outcome {
        Some(result) => accepted(&state, &handle, result),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// POST /chat/:id/quick/:index - Send a quick action's canned message.
async fn quick_action_handler(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Result<Response, StatusCode> {
    let handle = lookup(&state, &session_id)?;
    let action = QuickAction::from_index(index).ok_or(StatusCode::NOT_FOUND)?;

    // Offered only until the first exchange; a pending send still reports Busy.
    let result = handle.with(|s| {
        (s.awaiting_reply() || s.shows_quick_actions()).then(|| s.begin_send(action.message()))
    });

    let Some(result) = result else {
        tracing::warn!(
            name: "chat.quick_action.unavailable",
            session_id = %handle.id(),
            index,
            "Quick action used after the conversation started"
        );
        return Ok((StatusCode::CONFLICT, Html(render_interface(&state, &handle))).into_response());
    };
    Ok(accepted(&state, &handle, result))
}

/// POST /chat/:id/reply - Run the pending backend exchange.
async fn reply_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let handle = lookup(&state, &session_id)?;

    let outcome = handle.deliver_pending(&state.backend).await;

    let mut html = render_interface(&state, &handle);
    if let Some(Err(error)) = outcome {
        let toast = Toast::send_failed(&error);
        html.push_str(&toast.render_oob(state.config.ui.toast_timeout_ms));
    }
    Ok(Html(html))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// GET /health - Liveness probe.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Medical Scheduling Chat Widget",
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn lookup(state: &AppState, session_id: &str) -> Result<SessionHandle, StatusCode> {
    state.sessions.get(session_id).ok_or_else(|| {
        tracing::debug!(name: "session.not_found", session_id, "Unknown chat session");
        StatusCode::NOT_FOUND
    })
}

fn render_interface(state: &AppState, handle: &SessionHandle) -> String {
    let session = handle.snapshot();
    ChatInterfaceView {
        session: &session,
        session_id: handle.id(),
        placeholder: &state.config.ui.placeholder,
    }
    .render()
}

/// Response to a send attempt: the optimistic fragment, or `409` with the
/// fragment as it stands when a reply is still pending.
fn accepted(
    state: &AppState,
    handle: &SessionHandle,
    result: Result<SendTicket, SendError>,
) -> Response {
    match result {
        Ok(ticket) => {
            info!(
                name: "chat.send.queued",
                session_id = %handle.id(),
                seq = ticket.seq,
                "User message appended"
            );
            Html(render_interface(state, handle)).into_response()
        }
        Err(error) => {
            tracing::warn!(
                name: "chat.send.rejected",
                session_id = %handle.id(),
                error = %error,
                "Send rejected"
            );
            (StatusCode::CONFLICT, Html(render_interface(state, handle))).into_response()
        }
    }
}
