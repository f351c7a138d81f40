use serde::{Deserialize, Serialize};

/// What went wrong on the client side of a chat round trip, before any
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// A response arrived with a non-success status.
    Status { status: u16, reason: String },
    /// A success status arrived but the body was not usable JSON.
    InvalidBody(String),
    /// The request went out but no response came back (timeout, refused
    /// connection, reset).
    NoResponse(String),
    /// The request could not be built or sent at all.
    NotSent(String),
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailure::Status { status, reason } => {
                write!(f, "Server Error: {} - {}", status, reason)
            }
            TransportFailure::InvalidBody(detail) => {
                write!(f, "Server Error: unreadable response ({})", detail)
            }
            TransportFailure::NoResponse(_) => write!(
                f,
                "Network Error: Please check if the server is running and accessible."
            ),
            TransportFailure::NotSent(detail) => write!(f, "Error: {}", detail),
        }
    }
}

/// User-facing category of a failed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ServerError,
    NetworkError,
    ClientError,
}

const SERVER_ERROR_MESSAGE: &str = "The tutor server ran into a problem, but I'm still here to help! \
Try asking me about basic greetings, introductions, or common phrases in Tamil, Sinhala, or English.";

const NETWORK_ERROR_MESSAGE: &str = "I couldn't reach the tutor server just now. \
Please check your connection and try again. I'm still here to help you practice Tamil, Sinhala, and English!";

const CLIENT_ERROR_MESSAGE: &str = "Your message couldn't be sent this time. \
Please try again in a moment. I'm still here to help you practice Tamil, Sinhala, and English!";

impl ErrorCategory {
    /// Total mapping from a transport outcome to exactly one category.
    pub fn classify(failure: &TransportFailure) -> Self {
        match failure {
            TransportFailure::Status { .. } | TransportFailure::InvalidBody(_) => {
                ErrorCategory::ServerError
            }
            TransportFailure::NoResponse(_) => ErrorCategory::NetworkError,
            TransportFailure::NotSent(_) => ErrorCategory::ClientError,
        }
    }

    /// Fixed reassuring text shown in the chat log for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::ServerError => SERVER_ERROR_MESSAGE,
            ErrorCategory::NetworkError => NETWORK_ERROR_MESSAGE,
            ErrorCategory::ClientError => CLIENT_ERROR_MESSAGE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ServerError => "server_error",
            ErrorCategory::NetworkError => "network_error",
            ErrorCategory::ClientError => "client_error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transport failure after classification: the category drives the chat
/// log, the detail feeds the error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    category: ErrorCategory,
    detail: String,
}

impl ClassifiedError {
    pub fn new(category: ErrorCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn user_message(&self) -> &'static str {
        self.category.user_message()
    }
}

impl From<TransportFailure> for ClassifiedError {
    fn from(failure: TransportFailure) -> Self {
        let category = ErrorCategory::classify(&failure);
        Self::new(category, failure.to_string())
    }
}
