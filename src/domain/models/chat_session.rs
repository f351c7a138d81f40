use thiserror::Error;

use super::{ChatMessage, ClassifiedError, MessageId, TutorResponse};

/// Whether a round trip to the tutor is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Awaiting,
}

/// Why the session refused an action. A refused action leaves the session
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionRejection {
    #[error("message is blank")]
    BlankMessage,

    #[error("a reply is still pending")]
    ReplyPending,

    #[error("no reply is pending")]
    NothingPending,
}

/// Client-side chat log plus the single in-flight request guard.
///
/// The log is append-only apart from [`ChatSession::clear`]. Ids come from a
/// counter that survives `clear`, so they are strictly increasing for the
/// lifetime of the session.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: SessionState,
    next_id: u64,
    last_error: Option<ClassifiedError>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Optimistically append the learner's message and start awaiting a reply.
    pub fn submit(&mut self, text: &str) -> Result<&ChatMessage, SessionRejection> {
        if self.state == SessionState::Awaiting {
            return Err(SessionRejection::ReplyPending);
        }
        if text.trim().is_empty() {
            return Err(SessionRejection::BlankMessage);
        }

        let id = self.allocate_id();
        self.last_error = None;
        self.state = SessionState::Awaiting;
        Ok(self.append(ChatMessage::user(id, text)))
    }

    /// Append the tutor's reply and return to idle.
    pub fn resolve(&mut self, response: TutorResponse) -> Result<&ChatMessage, SessionRejection> {
        self.expect_awaiting()?;

        let id = self.allocate_id();
        self.state = SessionState::Idle;
        Ok(self.append(ChatMessage::ai(id, response)))
    }

    /// Append a synthetic reply for a failed round trip and return to idle.
    pub fn fail(&mut self, error: ClassifiedError) -> Result<&ChatMessage, SessionRejection> {
        self.expect_awaiting()?;

        let id = self.allocate_id();
        let message = ChatMessage::ai_notice(id, error.user_message());
        self.last_error = Some(error);
        self.state = SessionState::Idle;
        Ok(self.append(message))
    }

    /// Empty the log. The caller is responsible for having confirmed the
    /// action with the user.
    pub fn clear(&mut self) -> Result<(), SessionRejection> {
        if self.state == SessionState::Awaiting {
            return Err(SessionRejection::ReplyPending);
        }
        self.messages.clear();
        self.last_error = None;
        Ok(())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SessionState::Awaiting
    }

    /// The failure behind the most recent synthetic reply, until the next
    /// accepted submit.
    pub fn last_error(&self) -> Option<&ClassifiedError> {
        self.last_error.as_ref()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    fn expect_awaiting(&self) -> Result<(), SessionRejection> {
        match self.state {
            SessionState::Awaiting => Ok(()),
            SessionState::Idle => Err(SessionRejection::NothingPending),
        }
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId::new(self.next_id)
    }

    fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
