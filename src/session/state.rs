//! The canonical conversation log and its explicit transitions.

use crate::client::{ChatRequest, SendError, WireMessage};

use super::message::{Message, MessageIdGen, Role};

/// Where the view should scroll after the log changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollCommand {
    /// Nothing rendered yet.
    Stay,
    /// Bring the message with this id into view.
    Reveal(String),
}

/// Handle for one in-flight send, returned by [`ChatSession::begin_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    /// Sequence number of the send within the session.
    pub seq: u64,
    /// Payload to post to the backend.
    pub request: ChatRequest,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: SendTicket,
    dispatched: bool,
}

/// State of one chat session.
///
/// Every mutation goes through a named transition:
///
/// - [`ChatSession::init`] seeds the welcome message.
/// - [`ChatSession::begin_send`] appends the user message and opens the
///   single in-flight slot (`idle -> sending`).
/// - [`ChatSession::finish_send`] closes the slot and, on success, appends
///   the reply (`sending -> idle`).
#[derive(Debug, Clone)]
pub struct ChatSession {
    log: Vec<Message>,
    ids: MessageIdGen,
    system_prompt: Option<String>,
    in_flight: Option<InFlight>,
    sends: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::init()
    }
}

impl ChatSession {
    /// A fresh session holding only the welcome message.
    #[must_use]
    pub fn init() -> Self {
        Self {
            log: vec![Message::welcome()],
            ids: MessageIdGen::default(),
            system_prompt: None,
            in_flight: None,
            sends: 0,
        }
    }

    /// Prepend a system instruction to every outgoing payload.
    ///
    /// The prompt travels on the wire only; it never enters the thread.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    /// The full log in display order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    /// Messages that belong in the rendered thread.
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.log.iter().filter(|m| m.role.is_displayed())
    }

    /// Number of messages in the thread.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Always false: the welcome message is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Whether a send is waiting for its reply.
    #[must_use]
    pub fn awaiting_reply(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the pending send has not been handed to a backend yet.
    #[must_use]
    pub fn needs_dispatch(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|f| !f.dispatched)
    }

    /// Quick actions are offered until the first real exchange.
    #[must_use]
    pub fn shows_quick_actions(&self) -> bool {
        self.log.len() <= 1
    }

    /// Project the log onto the wire payload, system prompt first.
    #[must_use]
    pub fn wire_payload(&self) -> ChatRequest {
        let system = self.system_prompt.iter().map(|prompt| WireMessage {
            role: Role::System,
            content: prompt.clone(),
        });
        let history = self.log.iter().map(|m| WireMessage {
            role: m.role,
            content: m.content.clone(),
        });
        ChatRequest {
            messages: system.chain(history).collect(),
        }
    }

    /// Scroll target after the log changed: the newest visible message.
    #[must_use]
    pub fn on_list_changed(&self) -> ScrollCommand {
        self.visible_messages()
            .last()
            .map_or(ScrollCommand::Stay, |m| ScrollCommand::Reveal(m.id.clone()))
    }

    /// Append the user's message and open the in-flight slot.
    ///
    /// Rejects with [`SendError::Busy`] while another send is unresolved;
    /// nothing is appended in that case.
    pub fn begin_send(&mut self, text: impl Into<String>) -> Result<SendTicket, SendError> {
        if self.in_flight.is_some() {
            return Err(SendError::Busy);
        }

        let id = self.ids.next_id(Role::User);
        self.log.push(Message::new(id, Role::User, text));

        self.sends += 1;
        let ticket = SendTicket {
            seq: self.sends,
            request: self.wire_payload(),
        };
        self.in_flight = Some(InFlight {
            ticket: ticket.clone(),
            dispatched: false,
        });
        Ok(ticket)
    }

    /// Claim the pending send for delivery. Returns `None` if there is no
    /// pending send or it was already claimed.
    pub fn dispatch(&mut self) -> Option<SendTicket> {
        let in_flight = self.in_flight.as_mut().filter(|f| !f.dispatched)?;
        in_flight.dispatched = true;
        Some(in_flight.ticket.clone())
    }

    /// Resolve the send identified by `seq`.
    ///
    /// The in-flight slot is cleared whatever the outcome. On success the
    /// reply is appended and returned; on failure the user's message stays
    /// in the log and the error is handed back.
    pub fn finish_send(
        &mut self,
        seq: u64,
        outcome: Result<String, SendError>,
    ) -> Result<&Message, SendError> {
        if self.in_flight.as_ref().map(|f| f.ticket.seq) != Some(seq) {
            tracing::warn!(name: "chat.send.stale", seq, "Ignoring outcome of a send that is no longer in flight");
            return outcome.and(Err(SendError::Protocol));
        }
        self.in_flight = None;

        let reply = outcome?;
        let index = self.log.len();
        let id = self.ids.next_id(Role::Assistant);
        self.log.push(Message::new(id, Role::Assistant, reply));
        Ok(&self.log[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::WELCOME_ID;

    #[test]
    fn test_init_seeds_welcome_only() {
        let session = ChatSession::init();
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].id, WELCOME_ID);
        assert!(!session.awaiting_reply());
        assert!(session.shows_quick_actions());
    }

    #[test]
    fn test_begin_send_appends_and_projects() {
        let mut session = ChatSession::init();
        let ticket = session.begin_send("Book me for Tuesday").unwrap();

        assert!(session.awaiting_reply());
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[1].id, "user-1");

        let payload = &ticket.request.messages;
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].role, Role::Assistant);
        assert_eq!(
            ticket.request.last(),
            Some(&WireMessage {
                role: Role::User,
                content: "Book me for Tuesday".into()
            })
        );
    }

    #[test]
    fn test_second_send_is_rejected_while_in_flight() {
        let mut session = ChatSession::init();
        session.begin_send("first").unwrap();

        let err = session.begin_send("second").unwrap_err();
        assert!(matches!(err, SendError::Busy));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_finish_success_appends_reply() {
        let mut session = ChatSession::init();
        let ticket = session.begin_send("Hi").unwrap();

        let reply = session
            .finish_send(ticket.seq, Ok("Your appointment is booked.".into()))
            .unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.id, "assistant-2");

        assert!(!session.awaiting_reply());
        assert_eq!(session.len(), 3);
        assert_eq!(session.messages()[2].content, "Your appointment is booked.");
        assert!(!session.shows_quick_actions());
    }

    #[test]
    fn test_finish_failure_keeps_user_message() {
        let mut session = ChatSession::init();
        let ticket = session.begin_send("Hi").unwrap();

        let err = session
            .finish_send(
                ticket.seq,
                Err(SendError::Network {
                    status: 500,
                    status_text: "Internal Server Error".into(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, SendError::Network { status: 500, .. }));

        assert!(!session.awaiting_reply());
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[1].role, Role::User);

        // The session stays usable.
        assert!(session.begin_send("again").is_ok());
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let mut session = ChatSession::init();
        let ticket = session.begin_send("Hi").unwrap();

        assert!(session.finish_send(ticket.seq + 1, Ok("late".into())).is_err());
        assert!(session.awaiting_reply());
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_dispatch_is_claimed_once() {
        let mut session = ChatSession::init();
        assert!(session.dispatch().is_none());

        let ticket = session.begin_send("Hi").unwrap();
        assert!(session.needs_dispatch());
        assert_eq!(session.dispatch(), Some(ticket));
        assert!(!session.needs_dispatch());
        assert!(session.dispatch().is_none());
        assert!(session.awaiting_reply());
    }

    #[test]
    fn test_system_prompt_on_wire_only() {
        let mut session =
            ChatSession::init().with_system_prompt(Some("Be brief.".to_string()));
        let ticket = session.begin_send("Hi").unwrap();

        assert_eq!(ticket.request.messages[0].role, Role::System);
        assert_eq!(ticket.request.messages.len(), 3);
        assert!(session.visible_messages().all(|m| m.role != Role::System));
    }

    #[test]
    fn test_scroll_follows_newest_message() {
        let mut session = ChatSession::init();
        assert_eq!(
            session.on_list_changed(),
            ScrollCommand::Reveal(WELCOME_ID.to_string())
        );

        session.begin_send("Hi").unwrap();
        assert_eq!(
            session.on_list_changed(),
            ScrollCommand::Reveal("user-1".to_string())
        );
    }
}
