use async_trait::async_trait;

use crate::domain::{TransportFailure, TutorResponse};

/// Client-side view of the chat endpoint: one utterance in, one tutoring
/// reply out.
#[async_trait]
pub trait TutorApi: Send + Sync {
    async fn ask(&self, utterance: &str) -> Result<TutorResponse, TransportFailure>;
}
