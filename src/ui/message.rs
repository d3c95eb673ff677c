//! Chat message bubble.

use crate::session::{Message, Role};

use super::html::escape;
use super::icons::Icon;

/// Author of a rendered bubble. System messages have no bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleRole {
    User,
    Assistant,
}

impl TryFrom<Role> for BubbleRole {
    type Error = Role;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::User => Ok(Self::User),
            Role::Assistant => Ok(Self::Assistant),
            Role::System => Err(role),
        }
    }
}

impl BubbleRole {
    fn label(self) -> &'static str {
        match self {
            Self::Assistant => "Medical Assistant",
            Self::User => "You",
        }
    }
}

/// A single message bubble.
///
/// Pure: identical inputs render identical markup.
#[derive(Debug, Clone, Copy)]
pub struct ChatMessage<'a> {
    pub role: BubbleRole,
    pub content: &'a str,
    pub timestamp: Option<&'a str>,
    /// DOM id of the bubble, used as scroll anchor.
    pub anchor: Option<&'a str>,
}

impl<'a> ChatMessage<'a> {
    /// Bubble for a logged message, or `None` for roles that are not shown.
    #[must_use]
    pub fn from_message(message: &'a Message, timestamp: &'a str) -> Option<Self> {
        let role = BubbleRole::try_from(message.role).ok()?;
        Some(Self {
            role,
            content: &message.content,
            timestamp: Some(timestamp),
            anchor: Some(&message.id),
        })
    }

    /// Render to HTML.
    #[must_use]
    pub fn render(&self) -> String {
        let is_assistant = self.role == BubbleRole::Assistant;

        let container = if is_assistant {
            "bg-card"
        } else {
            "bg-secondary/50 ml-auto max-w-[80%]"
        };
        let id_attr = self
            .anchor
            .map(|id| format!(r#" id="msg-{}""#, escape(id)))
            .unwrap_or_default();

        let timestamp = self
            .timestamp
            .map(|t| {
                format!(
                    r#"<span class="text-xs text-muted-foreground">{}</span>"#,
                    escape(t)
                )
            })
            .unwrap_or_default();

        let avatar = |icon: Icon, gradient: &str, fg: &str| {
            format!(
                r#"<div class="flex-shrink-0 w-8 h-8 rounded-full {gradient} flex items-center justify-center shadow-soft">{}</div>"#,
                icon.render(&format!("w-4 h-4 {fg}"))
            )
        };
        let (leading, trailing) = if is_assistant {
            (
                avatar(Icon::Bot, "bg-gradient-primary", "text-primary-foreground"),
                String::new(),
            )
        } else {
            (
                String::new(),
                avatar(Icon::User, "bg-gradient-accent", "text-accent-foreground"),
            )
        };

        format!(
            r#"<div{id_attr} class="chat-message flex gap-3 p-4 rounded-lg animate-in slide-in-from-bottom-2 duration-300 {container}" data-role="{role}">{leading}<div class="flex-1 space-y-1"><div class="flex items-center gap-2"><span class="text-sm font-medium text-foreground">{label}</span>{timestamp}</div><p class="text-sm text-foreground leading-relaxed whitespace-pre-wrap">{content}</p></div>{trailing}</div>"#,
            role = if is_assistant { "assistant" } else { "user" },
            label = self.role.label(),
            content = escape(self.content),
        )
    }
}
