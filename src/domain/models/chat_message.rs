use serde::{Deserialize, Serialize};

use super::TutorResponse;

/// Ordering key of a chat message. Assigned at append time, never reused
/// within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    sender: Sender,
    text: String,
    response: Option<TutorResponse>,
}

impl ChatMessage {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            text: text.into(),
            response: None,
        }
    }

    /// An AI message carrying the full tutoring reply; its text is the reply's
    /// conversational part.
    pub fn ai(id: MessageId, response: TutorResponse) -> Self {
        Self {
            id,
            sender: Sender::Ai,
            text: response.ai_response.clone(),
            response: Some(response),
        }
    }

    /// A synthetic AI message with no tutoring reply attached.
    pub fn ai_notice(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::Ai,
            text: text.into(),
            response: None,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn response(&self) -> Option<&TutorResponse> {
        self.response.as_ref()
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}
