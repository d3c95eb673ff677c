//! Transient, dismissible notifications.

use crate::client::SendError;

use super::html::escape;
use super::icons::Icon;

/// DOM id of the region toasts are inserted into.
pub const TOAST_REGION_ID: &str = "toast-region";

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

impl ToastVariant {
    fn classes(self) -> &'static str {
        match self {
            Self::Default => "border bg-background text-foreground",
            Self::Destructive => "border-destructive bg-destructive text-destructive-foreground",
        }
    }
}

/// A notification shown in the corner of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    /// Error notification for a failed send.
    #[must_use]
    pub fn send_failed(error: &SendError) -> Self {
        Self {
            title: "Error".to_string(),
            description: error.user_message(),
            variant: ToastVariant::Destructive,
        }
    }

    /// Render for an out-of-band swap into the toast region.
    ///
    /// The toast hides itself after `timeout_ms` or when dismissed.
    #[must_use]
    pub fn render_oob(&self, timeout_ms: u64) -> String {
        format!(
            r#"<div hx-swap-oob="afterbegin:#{TOAST_REGION_ID}"><div role="alert" class="toast pointer-events-auto flex w-full items-start justify-between gap-4 rounded-md p-4 shadow-lg {classes}" x-data="{{ open: true }}" x-show="open" x-init="setTimeout(() => open = false, {timeout_ms})"><div class="grid gap-1"><div class="text-sm font-semibold">{title}</div><div class="text-sm opacity-90">{description}</div></div><button type="button" class="rounded-md p-1 opacity-70 hover:opacity-100" x-on:click="open = false"><span class="sr-only">Dismiss</span>{close}</button></div></div>"#,
            classes = self.variant.classes(),
            title = escape(&self.title),
            description = escape(&self.description),
            close = Icon::X.render(""),
        )
    }
}
