//! MediSchedule chat widget
//!
//! A conversational front end for a medical appointment-scheduling
//! assistant. The page is rendered on the server and kept live with HTMX;
//! every user message is forwarded with the full history to a backend chat
//! endpoint and the reply is appended to the thread.
//!
//! # Architecture
//!
//! - **Server**: Axum routes returning HTML fragments
//! - **Session**: Per-page conversation log with explicit send transitions
//! - **Client**: Backend chat exchange behind the [`client::ChatBackend`] trait
//! - **UI**: String-rendered markup + HTMX + Alpine.js
//!
//! # Modules
//!
//! - [`session`]: Conversation state and the session store
//! - [`client`]: Wire format and HTTP backend
//! - [`ui`]: Page, interface, message, input and toast rendering
//! - [`config`]: Layered configuration
//! - [`server`]: Router and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use crate::client::ChatBackend;
use crate::config::AppConfig;
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live chat sessions.
    pub sessions: SessionStore,
    /// Where conversations are sent for a reply.
    pub backend: Arc<dyn ChatBackend>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("backend", &self.backend)
            .finish()
    }
}

impl AppState {
    /// Fresh state with an empty session store.
    #[must_use]
    pub fn new(config: Arc<AppConfig>, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            sessions: SessionStore::with_system_prompt(config.session.system_prompt.clone()),
            backend,
            config,
        }
    }
}
