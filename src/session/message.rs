//! Conversation messages and the canned content a session starts with.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the seeded welcome message.
pub const WELCOME_ID: &str = "welcome";

/// Text of the seeded welcome message.
pub const WELCOME_TEXT: &str = "Hello! I'm your medical appointment scheduling assistant. I can help you:\n\n\
• Schedule appointments (General, Follow-up, Physical Exam, Specialist)\n\
• Answer questions about the clinic\n\
• Check available time slots\n\
• Handle rescheduling or cancellations\n\n\
How can I assist you today?";

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the patient.
    User,
    /// Reply from the scheduling assistant.
    Assistant,
    /// Reserved for instructions to the backend; never rendered.
    System,
}

impl Role {
    /// Lowercase wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }

    /// Whether messages with this role appear in the rendered thread.
    #[must_use]
    pub fn is_displayed(self) -> bool {
        !matches!(self, Self::System)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier, unique within one session.
    pub id: String,
    /// Author role.
    pub role: Role,
    /// Message text, line breaks preserved.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// The assistant-authored welcome message every session starts with.
    #[must_use]
    pub fn welcome() -> Self {
        Self::new(WELCOME_ID, Role::Assistant, WELCOME_TEXT)
    }

    /// Local wall-clock time shown next to the bubble, e.g. `2:05:09 PM`.
    #[must_use]
    pub fn display_time(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%-I:%M:%S %p")
            .to_string()
    }
}

/// Session-scoped id counter producing `user-1`, `assistant-2`, ...
#[derive(Debug, Clone, Default)]
pub struct MessageIdGen {
    last: u64,
}

impl MessageIdGen {
    /// Next id for a message authored by `role`.
    pub fn next_id(&mut self, role: Role) -> String {
        self.last += 1;
        format!("{role}-{}", self.last)
    }
}

/// Preset shortcuts offered before the conversation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    /// Start booking an appointment.
    ScheduleAppointment,
    /// Ask about clinic hours and location.
    ClinicInformation,
}

impl QuickAction {
    /// All quick actions in display order.
    pub const ALL: [Self; 2] = [Self::ScheduleAppointment, Self::ClinicInformation];

    /// Look up a quick action by its display position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ScheduleAppointment => "Schedule Appointment",
            Self::ClinicInformation => "Clinic Information",
        }
    }

    /// Text sent on the user's behalf.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ScheduleAppointment => "I'd like to schedule an appointment",
            Self::ClinicInformation => "Can you tell me about the clinic hours and location?",
        }
    }
}
