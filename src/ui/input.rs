//! Chat input: draft buffer, submit rule, and form markup.

use super::html::escape;
use super::icons::Icon;

/// Placeholder used when none is configured.
pub const DEFAULT_PLACEHOLDER: &str = "Type your message...";

/// Free-text input that emits trimmed, non-empty messages.
#[derive(Debug, Clone)]
pub struct ChatInput {
    draft: String,
    disabled: bool,
    placeholder: String,
}

impl Default for ChatInput {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl ChatInput {
    /// Empty, enabled input.
    #[must_use]
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            draft: String::new(),
            disabled: false,
            placeholder: placeholder.into(),
        }
    }

    /// Replace the draft text.
    #[must_use]
    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.draft = draft.into();
        self
    }

    /// Enable or disable submission.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Current draft.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether submission is suppressed.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Take the trimmed draft for sending and clear the buffer.
    ///
    /// No-op returning `None` when disabled or the draft is blank; the draft
    /// is left untouched in that case.
    pub fn submit(&mut self) -> Option<String> {
        if self.disabled {
            return None;
        }
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_owned();
        self.draft.clear();
        Some(text)
    }

    /// Render the form posting to `action`.
    ///
    /// Enter submits, Shift+Enter inserts a line break. The send button is
    /// disabled while the input is disabled or the draft is blank.
    #[must_use]
    pub fn render(&self, action: &str) -> String {
        let disabled = if self.disabled { " disabled" } else { "" };
        format!(
            r##"<form class="chat-input flex gap-2 items-end" hx-post="{action}" hx-target="#chat-interface" hx-swap="outerHTML" x-data="{{ message: '' }}">
    <textarea
        name="message"
        placeholder="{placeholder}"
        rows="2"
        class="flex w-full rounded-lg border bg-background px-3 py-2 text-sm min-h-[60px] max-h-[200px] resize-none transition-smooth focus:shadow-soft focus:border-primary disabled:cursor-not-allowed disabled:opacity-50"
        x-model="message"
        x-on:keydown.enter="if (!$event.shiftKey) {{ $event.preventDefault(); if (message.trim()) $el.form.requestSubmit() }}"{disabled}
    >{draft}</textarea>
    <button
        type="submit"
        class="inline-flex items-center justify-center h-[60px] w-[60px] rounded-xl shrink-0 bg-gradient-primary hover:shadow-hover transition-smooth disabled:opacity-50 disabled:cursor-not-allowed"
        x-bind:disabled="{bound_disabled} || !message.trim()"{disabled}
    >
        {icon}
        <span class="sr-only">Send message</span>
    </button>
</form>"##,
            action = escape(action),
            placeholder = escape(&self.placeholder),
            draft = escape(&self.draft),
            bound_disabled = self.disabled,
            icon = Icon::Send.render("h-5 w-5"),
        )
    }
}
