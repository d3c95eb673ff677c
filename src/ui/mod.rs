//! Server-rendered HTML for the chat widget.
//!
//! Markup is produced as strings and enhanced in the browser by HTMX (form
//! posts and fragment swaps) and Alpine.js (key handling, auto-scroll, toast
//! timers). No client bundle is required beyond those two vendored scripts.
//!
//! # Structure
//!
//! - [`page`]: Index page shell (header, info cards, footer)
//! - [`interface`]: Chat interface fragment, the unit every swap replaces
//! - [`message`]: Single message bubble
//! - [`input`]: Message input model and form
//! - [`toast`]: Error notifications
//! - [`icons`]: Inline SVG icons
//! - [`html`]: Escaping

pub mod html;
pub mod icons;
pub mod input;
pub mod interface;
pub mod message;
pub mod page;
pub mod toast;

pub use input::ChatInput;
pub use interface::{ChatInterfaceView, INTERFACE_ID, session_path};
pub use message::{BubbleRole, ChatMessage};
pub use page::render_index;
pub use toast::{Toast, ToastVariant};
