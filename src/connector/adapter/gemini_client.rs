use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::ModelGateway;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const API_VERSION_PATH: &str = "/v1beta/models";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// [`ModelGateway`] backed by the Gemini `generateContent` REST API.
///
/// | Variable          | Default                                     |
/// |-------------------|---------------------------------------------|
/// | `GEMINI_API_KEY`  | none (requests fail with a configuration error) |
/// | `GEMINI_MODEL`    | `gemini-1.5-flash`                          |
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let model: String = model.into();
        let base: String = base_url.into();
        let url = format!(
            "{}{API_VERSION_PATH}/{model}:generateContent",
            base.trim_end_matches('/')
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|e| {
                    warn!("GeminiClient: failed to build HTTP client ({e}), using defaults");
                    reqwest::Client::new()
                }),
            api_key: api_key.into(),
            model,
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first candidate, parts joined. `None` when the model
    /// produced no text at all (for example a safety block).
    fn first_candidate_text(response: GenerateResponse) -> Option<String> {
        let content = response.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        Some(text)
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "GeminiClient: API returned {status}"
            )));
        }

        let api_response: GenerateResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        Self::first_candidate_text(api_response)
            .ok_or_else(|| DomainError::upstream("Failed to get response from AI model."))
    }

    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_contains_model() {
        let client = GeminiClient::new("key", "gemini-pro", DEFAULT_BASE_URL, Duration::from_secs(1));
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            GeminiClient::first_candidate_text(response).as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn test_no_candidates_yields_none() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(GeminiClient::first_candidate_text(response).is_none());
    }

    #[test]
    fn test_empty_key_means_no_credentials() {
        let client = GeminiClient::new("", DEFAULT_MODEL, DEFAULT_BASE_URL, Duration::from_secs(1));
        assert!(!client.has_credentials());
    }
}
