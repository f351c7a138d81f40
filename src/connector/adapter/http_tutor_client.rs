use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::TutorApi;
use crate::domain::{ContractValidator, TransportFailure, TutorResponse};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5292";
pub const CHAT_PATH: &str = "/api/tutor/chat";
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    user_message: &'a str,
}

/// [`TutorApi`] over HTTP, talking to a running `trichat serve`.
///
/// Every way the round trip can go wrong is reported as a
/// [`TransportFailure`] so the session can classify it; nothing here panics
/// or retries.
pub struct HttpTutorClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpTutorClient {
    pub fn new(server_url: &str) -> Self {
        Self::with_timeout(server_url, DEFAULT_CLIENT_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("HttpTutorClient: failed to build HTTP client ({e}), using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            url: format!("{}{CHAT_PATH}", server_url.trim_end_matches('/')),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn failure_from(e: reqwest::Error) -> TransportFailure {
        // A timeout while the body is still streaming is still a missing response.
        if e.is_timeout() {
            TransportFailure::NoResponse(e.to_string())
        } else if e.is_builder() {
            TransportFailure::NotSent(e.to_string())
        } else if let Some(status) = e.status() {
            TransportFailure::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            }
        } else if e.is_decode() || e.is_body() {
            TransportFailure::InvalidBody(e.to_string())
        } else {
            TransportFailure::NoResponse(e.to_string())
        }
    }

    async fn round_trip(&self, utterance: &str) -> Result<TutorResponse, TransportFailure> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest {
                user_message: utterance,
            })
            .send()
            .await
            .map_err(Self::failure_from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("HttpTutorClient: server returned {status}: {body}");
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(Self::failure_from)?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| TransportFailure::InvalidBody(e.to_string()))?;

        let report = ContractValidator::inspect_value(&value);
        if !report.is_clean() {
            debug!(
                "HttpTutorClient: repaired server reply (fields: {:?}, fallback: {})",
                report.repaired_fields(),
                report.used_fallback()
            );
        }
        Ok(report.into_response())
    }
}

#[async_trait]
impl TutorApi for HttpTutorClient {
    /// The whole round trip, body included, is bounded by the timeout.
    async fn ask(&self, utterance: &str) -> Result<TutorResponse, TransportFailure> {
        match tokio::time::timeout(self.timeout, self.round_trip(utterance)).await {
            Ok(result) => result,
            Err(_) => Err(TransportFailure::NoResponse(format!(
                "no response within {:.1} seconds",
                self.timeout.as_secs_f64()
            ))),
        }
    }
}
