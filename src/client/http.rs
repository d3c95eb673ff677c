//! reqwest-backed [`ChatBackend`].

use std::time::Duration;

use url::Url;

use super::{ChatBackend, ChatReply, ChatRequest, SendError};
use crate::error::Error;

/// Backend reached over HTTP at `{base_url}{chat_path}`.
#[derive(Clone)]
pub struct HttpChatBackend {
    http: reqwest::Client,
    endpoint: Url,
}

impl std::fmt::Debug for HttpChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatBackend")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl HttpChatBackend {
    /// Create a backend client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme and authority of the backend, e.g. `http://localhost:8000`
    /// * `chat_path` - Path of the chat endpoint, normally `/api/chat`
    /// * `timeout` - Upper bound for one request, including reading the body
    pub fn new(base_url: &str, chat_path: &str, timeout: Duration) -> Result<Self, Error> {
        // Join relative to the base path so a prefix like `/svc` is kept.
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(chat_path.trim_start_matches('/'))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpChatBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, SendError> {
        tracing::debug!(
            name: "backend.request",
            endpoint = %self.endpoint,
            message_count = request.messages.len(),
            "Posting conversation to backend"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SendError::Network {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body: ChatReply = response.json().await.map_err(|error| {
            tracing::warn!(
                name: "backend.response.malformed",
                error = %error,
                "Backend returned a body that is not a chat reply"
            );
            SendError::Protocol
        })?;

        if let Some(state) = &body.state {
            tracing::debug!(name: "backend.response.state", state = %state, "Backend attached state");
        }

        body.into_text().ok_or(SendError::Protocol)
    }
}
