use crate::domain::{Feedback, TutorResponse};

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

const FALLBACK_AI_RESPONSE: &str = "I'm still learning how to provide the best responses. \
I'm here to help you practice Tamil, Sinhala, and English! \
Try asking me how to introduce yourself or request some common phrases.";

const FALLBACK_VOCABULARY: &str =
    "Practice makes perfect! Try asking specific questions about language learning.";

const FALLBACK_CODE_EXAMPLE: &str = "// You can ask me for code examples!\n\
// For example: 'Show me how to print a greeting'\n\
print(\"Hello, language learner!\");";

/// Produces the constant reply used when model output cannot be parsed at all.
pub struct FallbackSynthesizer;

impl FallbackSynthesizer {
    pub fn synthesize() -> TutorResponse {
        TutorResponse {
            language_used: UNKNOWN_LANGUAGE.to_string(),
            ai_response: FALLBACK_AI_RESPONSE.to_string(),
            feedback: Feedback::neutral(),
            vocabulary_suggestion: FALLBACK_VOCABULARY.to_string(),
            code_example: Some(FALLBACK_CODE_EXAMPLE.to_string()),
        }
    }
}
