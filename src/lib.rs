pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    ConversationUseCase, ModelGateway, TutorApi, TutorChatUseCase, DEFAULT_UPSTREAM_TIMEOUT,
};

pub use connector::{
    AnthropicClient, ClientRouter, Container, ContainerConfig, GeminiClient, HttpTutorClient,
    MockModelGateway, ModelProvider, Router,
};

pub use domain::{
    ChatMessage, ChatSession, ClassifiedError, ContractValidator, DomainError, ErrorCategory,
    ErrorType, FallbackSynthesizer, Feedback, PromptAssembler, ResponseSanitizer,
    SessionRejection, SessionState, TransportFailure, TutorResponse,
};
