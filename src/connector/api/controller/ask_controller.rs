use anyhow::{bail, Result};

use crate::application::TutorApi;
use crate::connector::adapter::HttpTutorClient;
use crate::domain::ClassifiedError;

/// One-shot probe: send a single message, print the whole reply.
pub struct AskController;

impl AskController {
    pub fn new() -> Self {
        Self
    }

    pub async fn ask(&self, message: String, url: String) -> Result<String> {
        let client = HttpTutorClient::new(&url);
        self.ask_with(&client, &message).await
    }

    pub async fn ask_with(&self, api: &dyn TutorApi, message: &str) -> Result<String> {
        match api.ask(message).await {
            Ok(response) => Ok(serde_json::to_string_pretty(&response)?),
            Err(failure) => {
                let error = ClassifiedError::from(failure);
                bail!("{} ({})", error.detail(), error.category())
            }
        }
    }
}

impl Default for AskController {
    fn default() -> Self {
        Self::new()
    }
}
