//! Live sessions and the send driver.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::client::{ChatBackend, SendError};

use super::message::Message;
use super::state::{ChatSession, SendTicket};

/// Shared handle to one page's chat session.
///
/// Cloning is cheap; all clones see the same state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
    id: String,
    state: Mutex<ChatSession>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl SessionHandle {
    fn new(id: String, session: ChatSession) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id,
                state: Mutex::new(session),
                last_activity: RwLock::new(Utc::now()),
            }),
        }
    }

    /// Session identifier used in URLs.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Run `f` against the session under its lock.
    ///
    /// The lock is released before this returns; never call it across an
    /// `.await`.
    pub fn with<R>(&self, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        let mut guard = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut guard);
        drop(guard);
        self.touch();
        out
    }

    /// Copy of the current state, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ChatSession {
        self.with(|s| s.clone())
    }

    /// Full send: optimistic append, one backend call, resolve.
    ///
    /// The awaiting-reply flag is cleared on every path out of this call.
    pub async fn send(
        &self,
        backend: &Arc<dyn ChatBackend>,
        text: impl Into<String>,
    ) -> Result<Message, SendError> {
        let ticket = self.with(|s| {
            let ticket = s.begin_send(text)?;
            s.dispatch();
            Ok::<_, SendError>(ticket)
        })?;
        self.deliver(backend, ticket).await
    }

    /// Deliver a send opened earlier by [`ChatSession::begin_send`].
    ///
    /// Returns `None` when nothing is waiting for delivery, including when
    /// another request already claimed it.
    pub async fn deliver_pending(
        &self,
        backend: &Arc<dyn ChatBackend>,
    ) -> Option<Result<Message, SendError>> {
        let ticket = self.with(ChatSession::dispatch)?;
        Some(self.deliver(backend, ticket).await)
    }

    /// Run the exchange on its own task so that the ticket is resolved even
    /// when the caller's future is dropped mid-flight.
    async fn deliver(
        &self,
        backend: &Arc<dyn ChatBackend>,
        ticket: SendTicket,
    ) -> Result<Message, SendError> {
        let seq = ticket.seq;
        let exchange = tokio::spawn(Self::exchange(
            self.clone(),
            Arc::clone(backend),
            ticket,
        ));

        match exchange.await {
            Ok(result) => result,
            Err(join_error) => {
                tracing::error!(
                    name: "chat.send.aborted",
                    session_id = %self.id(),
                    seq,
                    error = %join_error,
                    "Backend exchange task did not finish"
                );
                self.with(|s| s.finish_send(seq, Err(SendError::Protocol)).cloned())
            }
        }
    }

    async fn exchange(
        handle: Self,
        backend: Arc<dyn ChatBackend>,
        ticket: SendTicket,
    ) -> Result<Message, SendError> {
        tracing::info!(
            name: "chat.send.started",
            session_id = %handle.id(),
            seq = ticket.seq,
            message_count = ticket.request.messages.len(),
            "Sending conversation to backend"
        );

        let outcome = backend.chat(&ticket.request).await;
        let result = handle.with(|s| s.finish_send(ticket.seq, outcome).cloned());

        match &result {
            Ok(reply) => tracing::info!(
                name: "chat.send.completed",
                session_id = %handle.id(),
                seq = ticket.seq,
                reply_length = reply.content.len(),
                "Assistant reply appended"
            ),
            Err(error) => tracing::error!(
                name: "chat.send.failed",
                session_id = %handle.id(),
                seq = ticket.seq,
                error = %error,
                "Error sending message"
            ),
        }
        result
    }

    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Whether the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // A negative difference means clock skew; treat as active.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }
}

/// Thread-safe store of live sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionHandle>>>,
    system_prompt: Option<String>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose sessions prepend `prompt` to every payload.
    #[must_use]
    pub fn with_system_prompt(prompt: Option<String>) -> Self {
        Self {
            system_prompt: prompt,
            ..Self::default()
        }
    }

    /// Start a new seeded session.
    #[must_use]
    pub fn create(&self) -> SessionHandle {
        let id = Uuid::new_v4().to_string();
        let session = ChatSession::init().with_system_prompt(self.system_prompt.clone());
        let handle = SessionHandle::new(id.clone(), session);
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handle.clone());
        handle
    }

    /// Look up a session by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Remove a session by id.
    pub fn remove(&self, id: &str) -> Option<SessionHandle> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}
