use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends a fully assembled prompt to a large language model and returns its
/// raw text.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. The returned text is untrusted: it may be fenced, partial, or not
/// JSON at all.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Fails with [`DomainError::Upstream`] when the model refuses, errors, or
    /// cannot be reached.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    /// Whether the gateway holds the credentials it needs to make a call.
    fn has_credentials(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str;
}
