use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::application::{ModelGateway, TutorChatUseCase, DEFAULT_UPSTREAM_TIMEOUT};
use crate::connector::adapter::{anthropic_client, gemini_client};
use crate::connector::adapter::{AnthropicClient, GeminiClient, MockModelGateway};
use crate::domain::{DomainError, PromptAssembler};

/// Which model backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelProvider {
    #[default]
    Gemini,
    Anthropic,
    Mock,
}

impl ModelProvider {
    pub fn parse(label: &str) -> Result<Self, DomainError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            other => Err(DomainError::configuration(format!(
                "unknown model provider '{other}' (expected gemini, anthropic, or mock)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
            Self::Mock => "mock",
        }
    }
}

/// Server-side settings, read once at startup.
///
/// | Variable                    | Default            |
/// |-----------------------------|--------------------|
/// | `TRICHAT_PROVIDER`          | `gemini`           |
/// | `GEMINI_API_KEY`            | unset              |
/// | `GEMINI_MODEL`              | `gemini-1.5-flash` |
/// | `GEMINI_BASE_URL`           | Google endpoint    |
/// | `ANTHROPIC_API_KEY`         | unset              |
/// | `ANTHROPIC_MODEL`           | `claude-haiku-4-5` |
/// | `ANTHROPIC_BASE_URL`        | Anthropic endpoint |
/// | `TRICHAT_TIMEOUT_SECS`      | `45`               |
/// | `TRICHAT_INSTRUCTIONS_FILE` | built-in prompt    |
///
/// A missing API key is not a startup error: the server still runs and
/// answers chat requests with a configuration error.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub provider: ModelProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub instructions_file: Option<PathBuf>,
}

impl ContainerConfig {
    pub fn from_env(mock_model: bool) -> Result<Self> {
        Self::from_lookup(mock_model, |key| std::env::var(key).ok())
    }

    /// Same as [`ContainerConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(mock_model: bool, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = if mock_model {
            ModelProvider::Mock
        } else {
            match lookup("TRICHAT_PROVIDER") {
                Some(label) => ModelProvider::parse(&label)?,
                None => ModelProvider::default(),
            }
        };

        let (key_var, model_var, base_var, default_model, default_base) = match provider {
            ModelProvider::Anthropic => (
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_MODEL",
                "ANTHROPIC_BASE_URL",
                anthropic_client::DEFAULT_MODEL,
                anthropic_client::DEFAULT_BASE_URL,
            ),
            ModelProvider::Gemini | ModelProvider::Mock => (
                "GEMINI_API_KEY",
                "GEMINI_MODEL",
                "GEMINI_BASE_URL",
                gemini_client::DEFAULT_MODEL,
                gemini_client::DEFAULT_BASE_URL,
            ),
        };

        let timeout = match lookup("TRICHAT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    DomainError::configuration(format!(
                        "TRICHAT_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                if secs == 0 {
                    return Err(DomainError::configuration(
                        "TRICHAT_TIMEOUT_SECS must be greater than zero",
                    )
                    .into());
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        Ok(Self {
            provider,
            api_key: lookup(key_var).unwrap_or_default(),
            model: lookup(model_var).unwrap_or_else(|| default_model.to_string()),
            base_url: lookup(base_var).unwrap_or_else(|| default_base.to_string()),
            timeout,
            instructions_file: lookup("TRICHAT_INSTRUCTIONS_FILE").map(PathBuf::from),
        })
    }
}

/// Wires the configured gateway into the chat pipeline.
pub struct Container {
    chat_use_case: Arc<TutorChatUseCase>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let assembler = match &config.instructions_file {
            Some(path) => {
                let instructions = std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read instructions file {}", path.display())
                })?;
                info!("Loaded tutor instructions from {}", path.display());
                PromptAssembler::new(instructions)
            }
            None => PromptAssembler::default(),
        };

        let gateway: Arc<dyn ModelGateway> = match config.provider {
            ModelProvider::Mock => {
                debug!("Using mock model gateway");
                Arc::new(MockModelGateway::new().with_assembler(assembler.clone()))
            }
            ModelProvider::Gemini => Arc::new(GeminiClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
                config.timeout,
            )),
            ModelProvider::Anthropic => Arc::new(AnthropicClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
                config.timeout,
            )),
        };

        if !gateway.has_credentials() {
            warn!(
                "No API key configured for provider {}. Chat requests will be rejected.",
                config.provider.as_str()
            );
        }

        let chat_use_case = Arc::new(
            TutorChatUseCase::new(gateway)
                .with_assembler(assembler)
                .with_timeout(config.timeout),
        );

        Ok(Self {
            chat_use_case,
            config,
        })
    }

    pub fn chat_use_case(&self) -> Arc<TutorChatUseCase> {
        self.chat_use_case.clone()
    }

    pub fn provider(&self) -> ModelProvider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}
