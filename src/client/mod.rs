//! Client side of the backend chat exchange.
//!
//! The [`ChatBackend`] trait is the seam between the session logic and the
//! network. [`HttpChatBackend`] is the production implementation; tests
//! substitute scripted backends.
//!
//! # Wire contract
//!
//! `POST /api/chat` with `{"messages": [{"role", "content"}, ...]}`, answered
//! by `{"reply": "..."}`. See [`wire`].

pub mod error;
pub mod http;
pub mod wire;

pub use error::SendError;
pub use http::HttpChatBackend;
pub use wire::{ChatReply, ChatRequest, WireMessage};

/// Something that turns a conversation history into an assistant reply.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Send the history and return the reply text.
    async fn chat(&self, request: &ChatRequest) -> Result<String, SendError>;
}
