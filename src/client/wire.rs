//! JSON bodies exchanged with the backend chat endpoint.

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// One `{role, content}` pair of the outgoing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Full history in chronological order.
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    /// The most recent entry, normally the message just typed.
    #[must_use]
    pub fn last(&self) -> Option<&WireMessage> {
        self.messages.last()
    }
}

/// Body of a successful backend response.
///
/// Both fields are optional on the wire so that a missing `reply` can be
/// reported as a protocol failure instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
    /// Opaque conversation state some backends attach. Logged, never interpreted.
    #[serde(default)]
    pub state: Option<serde_json::Value>,
}

impl ChatReply {
    /// The reply text, if present and non-empty.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        self.reply.filter(|text| !text.is_empty())
    }
}
