use serde::{Deserialize, Serialize};

/// Kind of mistake the tutor spotted in the learner's utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorType {
    Grammar,
    Pronunciation,
    #[default]
    None,
}

impl ErrorType {
    /// Case-insensitive match against the three known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "grammar" => Some(ErrorType::Grammar),
            "pronunciation" => Some(ErrorType::Pronunciation),
            "none" => Some(ErrorType::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Grammar => "Grammar",
            ErrorType::Pronunciation => "Pronunciation",
            ErrorType::None => "None",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Correction feedback for the learner's last utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub is_correct: bool,
    pub error_type: ErrorType,
    pub user_original: String,
    pub correction: String,
    pub explanation: String,
}

impl Feedback {
    /// Feedback that flags nothing.
    pub fn neutral() -> Self {
        Self {
            is_correct: true,
            error_type: ErrorType::None,
            user_original: String::new(),
            correction: String::new(),
            explanation: String::new(),
        }
    }

    /// Whether a correction box should be shown to the learner.
    pub fn needs_correction(&self) -> bool {
        !self.is_correct
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::neutral()
    }
}

/// The structured tutoring reply returned by the chat endpoint.
///
/// Every field except `code_example` is always populated once the reply has
/// passed through [`crate::domain::ContractValidator`]. Serialized with the
/// snake_case keys of the HTTP contract; `code_example` is emitted as `null`
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorResponse {
    pub language_used: String,
    pub ai_response: String,
    pub feedback: Feedback,
    pub vocabulary_suggestion: String,
    pub code_example: Option<String>,
}

impl TutorResponse {
    pub fn has_code_example(&self) -> bool {
        self.code_example.is_some()
    }
}
