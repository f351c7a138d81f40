//! HTTP tests: the axum app bound on an ephemeral port, driven with reqwest
//! and with the crate's own client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::post;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use trichat::connector::api::controller::{AskController, ChatController};
use trichat::connector::api::http;
use trichat::{
    ConversationUseCase, DomainError, ErrorCategory, HttpTutorClient, MockModelGateway,
    ModelGateway, TransportFailure, TutorApi, TutorChatUseCase,
};

struct NoKeyGateway;

#[async_trait]
impl ModelGateway for NoKeyGateway {
    async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
        panic!("must not be called without credentials");
    }

    fn has_credentials(&self) -> bool {
        false
    }

    fn model_name(&self) -> &str {
        "no-key"
    }
}

struct RefusingGateway;

#[async_trait]
impl ModelGateway for RefusingGateway {
    async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::upstream("API returned 429 Too Many Requests"))
    }

    fn model_name(&self) -> &str {
        "refusing"
    }
}

async fn spawn_app(router: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_tutor(gateway: Arc<dyn ModelGateway>) -> SocketAddr {
    spawn_app(http::app(Arc::new(TutorChatUseCase::new(gateway)))).await
}

async fn post_chat(addr: SocketAddr, path: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_chat_returns_contract_shape() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::new())).await;

    let response = post_chat(
        addr,
        http::CHAT_ROUTE,
        serde_json::json!({ "userMessage": "How do I say thank you?" }),
    )
    .await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let object = body.as_object().unwrap();
    for key in [
        "language_used",
        "ai_response",
        "feedback",
        "vocabulary_suggestion",
        "code_example",
    ] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert_eq!(body["ai_response"], "You said: How do I say thank you?");
    assert_eq!(body["feedback"]["is_correct"], true);
    assert_eq!(body["feedback"]["error_type"], "None");
    assert!(body["code_example"].is_null());
}

#[tokio::test]
async fn test_legacy_route_is_served() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::new())).await;

    let response = post_chat(
        addr,
        http::LEGACY_CHAT_ROUTE,
        serde_json::json!({ "userMessage": "vanakkam" }),
    )
    .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_empty_message_is_bad_request() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::new())).await;

    let response = post_chat(addr, http::CHAT_ROUTE, serde_json::json!({ "userMessage": "  " })).await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "User message cannot be empty.");

    let response = post_chat(addr, http::CHAT_ROUTE, serde_json::json!({})).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_missing_key_is_bad_request() {
    let addr = spawn_tutor(Arc::new(NoKeyGateway)).await;

    let response = post_chat(addr, http::CHAT_ROUTE, serde_json::json!({ "userMessage": "hi" })).await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "API key is not configured.");
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let addr = spawn_tutor(Arc::new(RefusingGateway)).await;

    let response = post_chat(addr, http::CHAT_ROUTE, serde_json::json!({ "userMessage": "hi" })).await;
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.text().await.unwrap(),
        "Failed to get response from AI model."
    );
}

#[tokio::test]
async fn test_health() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::new())).await;

    let response = reqwest::get(format!("http://{addr}{}", http::HEALTH_ROUTE))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_client_reads_reply() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::fenced())).await;
    let client = HttpTutorClient::new(&format!("http://{addr}"));

    let response = client.ask("வணக்கம்").await.unwrap();
    assert_eq!(response.language_used, "Tamil");
}

#[tokio::test]
async fn test_client_classifies_server_error() {
    let addr = spawn_tutor(Arc::new(RefusingGateway)).await;
    let client = Arc::new(HttpTutorClient::new(&format!("http://{addr}")));

    let failure = client.ask("hi").await.unwrap_err();
    assert_eq!(
        failure,
        TransportFailure::Status {
            status: 500,
            reason: "Internal Server Error".to_string()
        }
    );

    let mut conversation = ConversationUseCase::new(client);
    let message = conversation.send("hi").await.unwrap();
    assert_eq!(message.text(), ErrorCategory::ServerError.user_message());

    let error = conversation.session().last_error().unwrap();
    assert_eq!(error.detail(), "Server Error: 500 - Internal Server Error");
}

/// Raw TCP server that accepts one connection, reads the request, writes
/// `reply` and then holds the socket open without sending anything else.
async fn spawn_stalling_server(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket.write_all(reply).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });
    addr
}

#[tokio::test]
async fn test_client_timeout_before_headers_is_network_error() {
    let addr = spawn_stalling_server(b"").await;
    let client = HttpTutorClient::with_timeout(&format!("http://{addr}"), Duration::from_millis(500));

    let failure = client.ask("hello").await.unwrap_err();
    assert!(matches!(failure, TransportFailure::NoResponse(_)), "{failure:?}");
    assert_eq!(ErrorCategory::classify(&failure), ErrorCategory::NetworkError);
}

#[tokio::test]
async fn test_client_timeout_mid_body_is_network_error() {
    let addr = spawn_stalling_server(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{",
    )
    .await;
    let client = Arc::new(HttpTutorClient::with_timeout(
        &format!("http://{addr}"),
        Duration::from_millis(500),
    ));

    let failure = client.ask("hello").await.unwrap_err();
    assert!(matches!(failure, TransportFailure::NoResponse(_)), "{failure:?}");
    assert_eq!(ErrorCategory::classify(&failure), ErrorCategory::NetworkError);
}

#[tokio::test]
async fn test_stalled_reply_shows_network_message_in_session() {
    let addr = spawn_stalling_server(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{",
    )
    .await;
    let client = Arc::new(HttpTutorClient::with_timeout(
        &format!("http://{addr}"),
        Duration::from_millis(500),
    ));
    let mut conversation = ConversationUseCase::new(client);

    let message = conversation.send("hello").await.unwrap();
    assert_eq!(message.text(), ErrorCategory::NetworkError.user_message());
    assert!(!conversation.session().is_pending());
}

#[tokio::test]
async fn test_client_classifies_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Arc::new(HttpTutorClient::new(&format!("http://{addr}")));
    let mut conversation = ConversationUseCase::new(client);

    let message = conversation.send("hello").await.unwrap();
    assert_eq!(message.text(), ErrorCategory::NetworkError.user_message());
    assert_eq!(
        conversation.session().last_error().unwrap().category(),
        ErrorCategory::NetworkError
    );
}

#[tokio::test]
async fn test_client_treats_non_json_body_as_server_error() {
    let router = axum::Router::new().route(
        http::CHAT_ROUTE,
        post(|| async { "<html>maintenance</html>" }),
    );
    let addr = spawn_app(router).await;
    let client = HttpTutorClient::new(&format!("http://{addr}"));

    let failure = client.ask("hi").await.unwrap_err();
    assert!(matches!(failure, TransportFailure::InvalidBody(_)));
    assert_eq!(
        ErrorCategory::classify(&failure),
        ErrorCategory::ServerError
    );
}

#[tokio::test]
async fn test_client_repairs_incomplete_server_json() {
    let router = axum::Router::new().route(
        http::CHAT_ROUTE,
        post(|| async { axum::Json(serde_json::json!({ "ai_response": "Hi!" })) }),
    );
    let addr = spawn_app(router).await;
    let client = HttpTutorClient::new(&format!("http://{addr}"));

    let response = client.ask("hi").await.unwrap();
    assert_eq!(response.ai_response, "Hi!");
    assert_eq!(response.language_used, "Unknown");
    assert!(response.feedback.is_correct);
}

#[tokio::test]
async fn test_ask_prints_full_json() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::new())).await;

    let output = AskController::new()
        .ask("hello".to_string(), format!("http://{addr}"))
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(body["language_used"], "English");
}

#[tokio::test]
async fn test_terminal_chat_session() {
    let addr = spawn_tutor(Arc::new(MockModelGateway::new())).await;
    let api: Arc<dyn TutorApi> = Arc::new(HttpTutorClient::new(&format!("http://{addr}")));

    let input = "hello\n\n/clear\nn\nvanakkam\n/clear\ny\n/quit\nignored\n";
    let mut output: Vec<u8> = Vec::new();

    let summary = ChatController::new()
        .run(api, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("You: hello"));
    assert!(transcript.contains("AI is thinking..."));
    assert!(transcript.contains("AI [English]: You said: hello"));
    assert!(transcript.contains("Are you sure you want to clear the conversation?"));
    assert_eq!(transcript.matches("Conversation cleared.").count(), 1);
    assert!(!transcript.contains("ignored"));
    assert_eq!(summary, "Goodbye! 0 messages in this conversation.");
}
