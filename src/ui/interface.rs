//! The chat interface: thread, typing indicator, quick actions, and input.

use std::fmt::Write as _;

use crate::session::{ChatSession, QuickAction, ScrollCommand};

use super::html::escape;
use super::icons::Icon;
use super::input::ChatInput;
use super::message::ChatMessage;

/// DOM id of the interface root; every HTMX swap targets it.
pub const INTERFACE_ID: &str = "chat-interface";

/// URL of a per-session route, e.g. `/chat/{id}/reply`.
#[must_use]
pub fn session_path(session_id: &str, tail: &str) -> String {
    format!("/chat/{session_id}{tail}")
}

/// Render view over a session snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ChatInterfaceView<'a> {
    pub session: &'a ChatSession,
    pub session_id: &'a str,
    pub placeholder: &'a str,
}

impl ChatInterfaceView<'_> {
    /// Render the whole interface fragment.
    #[must_use]
    pub fn render(&self) -> String {
        let id = escape(self.session_id);
        let awaiting = self.session.awaiting_reply();

        let input = ChatInput::new(self.placeholder)
            .with_disabled(awaiting)
            .render(&session_path(self.session_id, "/messages"));

        format!(
            r#"<div id="{INTERFACE_ID}" class="flex flex-col h-full" data-session-id="{id}" data-awaiting="{awaiting}"><div id="chat-thread" class="flex-1 overflow-y-auto p-6 space-y-4"{scroll}>{thread}{typing}<div id="chat-thread-end"></div></div>{quick}<div class="border-t bg-card p-6">{input}</div>{loader}</div>"#,
            scroll = self.scroll_hook(),
            thread = self.render_thread(),
            typing = if awaiting { typing_indicator() } else { String::new() },
            quick = self.render_quick_actions(),
            loader = self.render_reply_loader(),
        )
    }

    fn render_thread(&self) -> String {
        let mut out = String::new();
        for message in self.session.visible_messages() {
            let time = message.display_time();
            if let Some(bubble) = ChatMessage::from_message(message, &time) {
                out.push_str(&bubble.render());
            }
        }
        out
    }

    fn scroll_hook(&self) -> String {
        match self.session.on_list_changed() {
            ScrollCommand::Stay => String::new(),
            ScrollCommand::Reveal(message_id) => format!(
                r#" x-data x-init="$nextTick(() => document.getElementById('msg-{}')?.scrollIntoView({{ behavior: 'smooth' }}))""#,
                escape(&message_id)
            ),
        }
    }

    fn render_quick_actions(&self) -> String {
        if !self.session.shows_quick_actions() {
            return String::new();
        }
        let disabled = if self.session.awaiting_reply() {
            " disabled"
        } else {
            ""
        };

        let mut buttons = String::new();
        for (index, action) in QuickAction::ALL.into_iter().enumerate() {
            let icon = match action {
                QuickAction::ScheduleAppointment => Icon::Calendar,
                QuickAction::ClinicInformation => Icon::MessageSquare,
            };
            let _ = write!(
                buttons,
                r##"<button type="button" class="quick-action inline-flex items-center gap-2 h-8 px-3 text-xs rounded-lg border bg-transparent hover:shadow-soft transition-smooth disabled:opacity-50" hx-post="{path}" hx-target="#{INTERFACE_ID}" hx-swap="outerHTML"{disabled}>{icon}{label}</button>"##,
                path = escape(&session_path(self.session_id, &format!("/quick/{index}"))),
                icon = icon.render(""),
                label = action.label(),
            );
        }
        format!(r#"<div class="px-6 pb-4"><div class="flex gap-3 flex-wrap">{buttons}</div></div>"#)
    }

    /// Hidden element that drives the reply exchange once the optimistic
    /// fragment is on screen. Polls while another request owns the exchange.
    fn render_reply_loader(&self) -> String {
        if self.session.needs_dispatch() {
            format!(
                r##"<div class="hidden" hx-post="{}" hx-trigger="load" hx-target="#{INTERFACE_ID}" hx-swap="outerHTML"></div>"##,
                escape(&session_path(self.session_id, "/reply"))
            )
        } else if self.session.awaiting_reply() {
            format!(
                r##"<div class="hidden" hx-get="{}" hx-trigger="load delay:1s" hx-target="#{INTERFACE_ID}" hx-swap="outerHTML"></div>"##,
                escape(&session_path(self.session_id, ""))
            )
        } else {
            String::new()
        }
    }
}

fn typing_indicator() -> String {
    format!(
        r#"<div class="typing-indicator flex gap-3 p-4"><div class="w-8 h-8 rounded-full bg-gradient-primary flex items-center justify-center shadow-soft">{}</div><div class="flex-1"><p class="text-sm text-muted-foreground">Assistant is typing...</p></div></div>"#,
        Icon::Loader.render("w-4 h-4 text-primary-foreground")
    )
}
