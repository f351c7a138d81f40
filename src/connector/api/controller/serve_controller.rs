use anyhow::{Context, Result};
use tracing::info;

use super::super::http;
use super::super::Container;

pub struct ServeController<'a> {
    container: &'a Container,
}

impl<'a> ServeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Serve until Ctrl-C.
    pub async fn serve(&self, port: u16, public: bool) -> Result<String> {
        let host = if public { "0.0.0.0" } else { "127.0.0.1" };
        let bind = format!("{host}:{port}");

        let listener = tokio::net::TcpListener::bind(&bind)
            .await
            .with_context(|| format!("failed to bind {bind}"))?;

        info!(
            %bind,
            provider = self.container.provider().as_str(),
            model = self.container.model(),
            "Starting tutor server"
        );

        axum::serve(listener, http::app(self.container.chat_use_case()))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok("Server stopped.".to_string())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
