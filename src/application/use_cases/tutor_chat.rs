use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::application::ModelGateway;
use crate::domain::{ContractValidator, DomainError, PromptAssembler, ResponseSanitizer, TutorResponse};

/// How long a single model call may take before it counts as failed.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(45);

/// Server-side chat pipeline: learner text in, contract-conforming reply out.
///
/// Stateless per request, so one instance is shared by every concurrent
/// request. Only configuration, input, and upstream failures escape as
/// errors; anything wrong with the model's text is repaired here.
pub struct TutorChatUseCase {
    gateway: Arc<dyn ModelGateway>,
    assembler: PromptAssembler,
    timeout: Duration,
}

impl TutorChatUseCase {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            assembler: PromptAssembler::default(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.assembler
    }

    pub async fn execute(&self, user_message: &str) -> Result<TutorResponse, DomainError> {
        if !self.gateway.has_credentials() {
            error!("API key is not configured for model {}", self.gateway.model_name());
            return Err(DomainError::configuration("API key is not configured."));
        }

        if user_message.trim().is_empty() {
            warn!("Rejected empty user message");
            return Err(DomainError::invalid_input("User message cannot be empty."));
        }

        info!(
            "Received message ({} chars) for model {}",
            user_message.chars().count(),
            self.gateway.model_name()
        );

        let prompt = self.assembler.assemble(user_message);
        debug!("Sending prompt of {} bytes", prompt.len());

        let start_time = Instant::now();
        let raw = match tokio::time::timeout(self.timeout, self.gateway.generate(&prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                error!(
                    "Model did not answer within {}s",
                    self.timeout.as_secs_f64()
                );
                return Err(DomainError::upstream(format!(
                    "model did not answer within {} seconds",
                    self.timeout.as_secs()
                )));
            }
        };
        debug!(
            "Model answered in {:.2}s: {}",
            start_time.elapsed().as_secs_f64(),
            raw
        );

        let sanitized = ResponseSanitizer::sanitize(&raw);
        let report = ContractValidator::inspect(&sanitized);

        if let Some(cause) = report.fallback_cause() {
            warn!("{cause}. Using fallback response. Raw text: {sanitized}");
        } else if !report.repaired_fields().is_empty() {
            debug!(
                "Repaired fields in model response: {}",
                report.repaired_fields().join(", ")
            );
        }

        Ok(report.into_response())
    }
}
