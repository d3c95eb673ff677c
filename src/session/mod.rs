//! Chat session state.
//!
//! Each page load owns one [`ChatSession`]: an ordered log of [`Message`]s
//! seeded with the assistant's welcome, plus a single in-flight slot for the
//! send awaiting its reply. Sessions live in memory only and are swept after
//! a period of inactivity.
//!
//! # Architecture
//!
//! - [`ChatSession`]: the log and its transitions (`init`, `begin_send`,
//!   `finish_send`, `on_list_changed`)
//! - [`SessionHandle`]: lock-guarded shared session plus the async send driver
//! - [`SessionStore`]: thread-safe map of live sessions
//!
//! # Example
//!
//! ```rust
//! use medischedule_chat::session::{Role, SessionStore};
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! let ticket = session.with(|s| s.begin_send("Hello!")).unwrap();
//!
//! assert_eq!(ticket.request.messages.len(), 2);
//! assert_eq!(ticket.request.messages[0].role, Role::Assistant);
//! assert!(session.snapshot().awaiting_reply());
//! ```

mod message;
mod state;
mod store;

pub use message::{Message, MessageIdGen, QuickAction, Role, WELCOME_ID, WELCOME_TEXT};
pub use state::{ChatSession, ScrollCommand, SendTicket};
pub use store::{SessionHandle, SessionStore};
