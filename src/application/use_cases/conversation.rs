use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::TutorApi;
use crate::domain::{ChatMessage, ChatSession, ClassifiedError, SessionRejection};

/// Drives one [`ChatSession`] against the tutor endpoint.
///
/// A round trip is split into [`submit`](Self::submit), which appends the
/// learner's message right away, and [`await_reply`](Self::await_reply), which
/// waits for the endpoint and appends either the reply or a synthetic message
/// for the classified failure. There is no cancellation: once submitted, the
/// session stays pending until the endpoint answers or fails.
pub struct ConversationUseCase {
    api: Arc<dyn TutorApi>,
    session: ChatSession,
}

impl ConversationUseCase {
    pub fn new(api: Arc<dyn TutorApi>) -> Self {
        Self {
            api,
            session: ChatSession::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn submit(&mut self, text: &str) -> Result<&ChatMessage, SessionRejection> {
        self.session.submit(text)
    }

    pub async fn await_reply(&mut self) -> Result<&ChatMessage, SessionRejection> {
        if !self.session.is_pending() {
            return Err(SessionRejection::NothingPending);
        }
        let utterance = self
            .session
            .last_message()
            .map(|m| m.text().to_string())
            .ok_or(SessionRejection::NothingPending)?;

        match self.api.ask(&utterance).await {
            Ok(response) => {
                debug!("Tutor replied in {}", response.language_used);
                self.session.resolve(response)
            }
            Err(failure) => {
                let error = ClassifiedError::from(failure);
                warn!("Chat round trip failed ({}): {}", error.category(), error.detail());
                self.session.fail(error)
            }
        }
    }

    /// Submit and wait in one step.
    pub async fn send(&mut self, text: &str) -> Result<&ChatMessage, SessionRejection> {
        self.session.submit(text)?;
        self.await_reply().await
    }

    /// Clear the log if the user confirmed. Returns whether anything was
    /// cleared.
    pub fn clear(&mut self, confirmed: bool) -> Result<bool, SessionRejection> {
        if !confirmed || self.session.is_empty() {
            return Ok(false);
        }
        self.session.clear()?;
        Ok(true)
    }
}
