use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, ServeController};

/// Dispatches server-side commands. Client commands never touch the
/// container and go through [`ClientRouter`].
pub struct Router<'a> {
    serve_controller: ServeController<'a>,
    client: ClientRouter,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            serve_controller: ServeController::new(container),
            client: ClientRouter::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Serve { port, public } => self.serve_controller.serve(port, public).await,
            other => self.client.route(other).await,
        }
    }
}

/// Dispatches commands that only talk to a running server.
pub struct ClientRouter {
    chat_controller: ChatController,
    ask_controller: AskController,
}

impl ClientRouter {
    pub fn new() -> Self {
        Self {
            chat_controller: ChatController::new(),
            ask_controller: AskController::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { url } => self.chat_controller.chat(url).await,
            Commands::Ask { message, url } => self.ask_controller.ask(message, url).await,
            Commands::Serve { .. } => unreachable!("serve is routed through Router"),
        }
    }
}

impl Default for ClientRouter {
    fn default() -> Self {
        Self::new()
    }
}
