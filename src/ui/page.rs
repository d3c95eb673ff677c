//! Index page shell.

use super::icons::Icon;
use super::interface::ChatInterfaceView;
use super::toast::TOAST_REGION_ID;

/// Static info card shown above the chat.
struct InfoCard {
    icon: Icon,
    tint: &'static str,
    title: &'static str,
    description: &'static str,
}

const INFO_CARDS: [InfoCard; 3] = [
    InfoCard {
        icon: Icon::Calendar,
        tint: "bg-primary/10 text-primary",
        title: "Smart Scheduling",
        description: "AI-powered appointment booking with real-time availability",
    },
    InfoCard {
        icon: Icon::Activity,
        tint: "bg-accent/10 text-accent",
        title: "Instant Answers",
        description: "Get quick answers to clinic FAQs and policies",
    },
    InfoCard {
        icon: Icon::Shield,
        tint: "bg-secondary/50 text-foreground",
        title: "Secure & Private",
        description: "Your health information is protected and confidential",
    },
];

/// Render the full page with the chat interface mounted in a card.
#[must_use]
pub fn render_index(chat: &ChatInterfaceView<'_>) -> String {
    let cards: String = INFO_CARDS.iter().map(render_card).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Intelligent medical appointment scheduling assistant">
    <title>MediSchedule</title>

    <!-- HTMX and Alpine (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script defer src="/static/vendor/alpine.min.js"></script>

    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-gradient-subtle">
    <header class="border-b bg-card/80 backdrop-blur-sm sticky top-0 z-10">
        <div class="container mx-auto px-4 py-4">
            <div class="flex items-center justify-between">
                <div class="flex items-center gap-3">
                    <div class="w-10 h-10 rounded-xl bg-gradient-primary flex items-center justify-center shadow-soft">
                        {brand_icon}
                    </div>
                    <div>
                        <h1 class="text-xl font-semibold text-foreground">MediSchedule</h1>
                        <p class="text-xs text-muted-foreground">Intelligent Appointment Scheduling</p>
                    </div>
                </div>
                <div class="hidden md:flex items-center gap-1 px-3 py-1.5 rounded-full bg-accent/10 text-accent text-sm font-medium">
                    {clock_icon}
                    <span>24/7 Available</span>
                </div>
            </div>
        </div>
    </header>

    <main class="container mx-auto px-4 py-8">
        <div class="max-w-6xl mx-auto">
            <div class="grid md:grid-cols-3 gap-4 mb-8">
                {cards}
            </div>

            <div class="rounded-xl border bg-card overflow-hidden shadow-medium">
                <div class="h-[calc(100vh-280px)] min-h-[500px] flex flex-col">
                    {chat}
                </div>
            </div>

            <footer class="mt-6 text-center">
                <p class="text-sm text-muted-foreground">
                    Clinic Hours: Mon-Fri 8:00 AM - 6:00 PM, Sat 9:00 AM - 2:00 PM
                </p>
                <p class="text-xs text-muted-foreground mt-1">
                    Emergency? Call 911 or visit the nearest emergency room
                </p>
            </footer>
        </div>
    </main>

    <div id="{TOAST_REGION_ID}" class="fixed bottom-4 right-4 z-50 flex w-full max-w-sm flex-col gap-2" aria-live="assertive"></div>
</body>
</html>"#,
        brand_icon = Icon::Activity.render("w-5 h-5 text-primary-foreground"),
        clock_icon = Icon::Clock.render(""),
        chat = chat.render(),
    )
}

fn render_card(card: &InfoCard) -> String {
    format!(
        r#"<div class="rounded-xl border p-4 bg-card hover:shadow-medium transition-smooth"><div class="flex items-start gap-3"><div class="p-2 rounded-lg {tint}">{icon}</div><div><h3 class="font-semibold text-sm text-foreground mb-1">{title}</h3><p class="text-xs text-muted-foreground">{description}</p></div></div></div>"#,
        tint = card.tint,
        icon = card.icon.render("w-5 h-5"),
        title = super::html::escape(card.title),
        description = card.description,
    )
}
