//! HTTP surface of the tutor: one chat endpoint plus a health probe.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::TutorChatUseCase;
use crate::domain::{DomainError, TutorResponse};

pub const CHAT_ROUTE: &str = "/api/tutor/chat";
pub const LEGACY_CHAT_ROUTE: &str = "/api/GeminiTutor/chat";
pub const HEALTH_ROUTE: &str = "/health";

const UPSTREAM_FAILURE_TEXT: &str = "Failed to get response from AI model.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_message: Option<String>,
}

/// Maps a [`DomainError`] onto a plain-text HTTP reply.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::Configuration(reason) | DomainError::InvalidInput(reason) => {
                (StatusCode::BAD_REQUEST, reason).into_response()
            }
            DomainError::Upstream(reason) => {
                error!("Upstream failure: {reason}");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_TEXT).into_response()
            }
            other => {
                error!("Unexpected failure: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred: {other}"),
                )
                    .into_response()
            }
        }
    }
}

/// Builds the router. The use case is shared by every request.
pub fn app(use_case: Arc<TutorChatUseCase>) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(chat))
        .route(LEGACY_CHAT_ROUTE, post(chat))
        .route(HEALTH_ROUTE, get(|| async { "ok" }))
        .with_state(use_case)
}

async fn chat(
    State(use_case): State<Arc<TutorChatUseCase>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<TutorResponse>, ApiError> {
    let span = info_span!("chat", request_id = %Uuid::new_v4());

    async move {
        // An unreadable body carries no message, which is the same as an empty one.
        let request = match body {
            Ok(Json(request)) => request,
            Err(rejection) => {
                warn!("Unreadable chat request: {}", rejection.body_text());
                ChatRequest::default()
            }
        };
        let message = request.user_message.unwrap_or_default();

        let response = use_case.execute(&message).await?;
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}
