//! Inline SVG icons.
//!
//! Icons are rendered inline so they inherit `currentColor` and need no
//! extra requests.

/// Common icon size class.
const ICON_SIZE: &str = "h-4 w-4";

/// Icons used by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Send,
    Loader,
    X,
    User,
    Bot,
    Calendar,
    MessageSquare,
    Activity,
    Clock,
    Shield,
}

impl Icon {
    fn body(self) -> &'static str {
        match self {
            Self::Send => r#"<line x1="22" y1="2" x2="11" y2="13"/><polygon points="22 2 15 22 11 13 2 9 22 2"/>"#,
            Self::Loader => r#"<path d="M21 12a9 9 0 1 1-6.219-8.56"/>"#,
            Self::X => r#"<line x1="18" y1="6" x2="6" y2="18"/><line x1="6" y1="6" x2="18" y2="18"/>"#,
            Self::User => r#"<path d="M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#,
            Self::Bot => r#"<rect x="3" y="11" width="18" height="10" rx="2"/><circle cx="12" cy="5" r="2"/><path d="M12 7v4"/><line x1="8" y1="16" x2="8" y2="16"/><line x1="16" y1="16" x2="16" y2="16"/>"#,
            Self::Calendar => r#"<rect x="3" y="4" width="18" height="18" rx="2" ry="2"/><line x1="16" y1="2" x2="16" y2="6"/><line x1="8" y1="2" x2="8" y2="6"/><line x1="3" y1="10" x2="21" y2="10"/>"#,
            Self::MessageSquare => r#"<path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/>"#,
            Self::Activity => r#"<path d="M22 12h-4l-3 9L9 3l-3 9H2"/>"#,
            Self::Clock => r#"<circle cx="12" cy="12" r="10"/><polyline points="12 6 12 12 16 14"/>"#,
            Self::Shield => r#"<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>"#,
        }
    }

    /// Render as an inline `<svg>` with extra classes appended.
    #[must_use]
    pub fn render(self, class: &str) -> String {
        let spin = if self == Self::Loader { " animate-spin" } else { "" };
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true" class="{ICON_SIZE} {class}{spin}">{}</svg>"#,
            self.body()
        )
    }
}
