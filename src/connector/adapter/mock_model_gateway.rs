use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::application::ModelGateway;
use crate::domain::{DomainError, PromptAssembler};

/// Offline [`ModelGateway`] for local runs and tests.
///
/// Answers every prompt with a well-formed tutoring reply that echoes the
/// learner's message. The language is guessed from the script of the
/// utterance, so Tamil and Sinhala input can be exercised without a model.
pub struct MockModelGateway {
    fenced: bool,
    assembler: PromptAssembler,
}

impl MockModelGateway {
    pub fn new() -> Self {
        Self {
            fenced: false,
            assembler: PromptAssembler::default(),
        }
    }

    /// Wrap replies in a ```json fence, the way hosted models often do.
    pub fn fenced() -> Self {
        Self {
            fenced: true,
            ..Self::new()
        }
    }

    /// The assembler whose prompts this gateway will receive, so the
    /// utterance can be cut out exactly.
    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    fn detect_language(utterance: &str) -> &'static str {
        let tamil = utterance
            .chars()
            .filter(|c| ('\u{0B80}'..='\u{0BFF}').contains(c))
            .count();
        let sinhala = utterance
            .chars()
            .filter(|c| ('\u{0D80}'..='\u{0DFF}').contains(c))
            .count();

        match (tamil, sinhala) {
            (0, 0) => "English",
            (t, s) if t >= s => "Tamil",
            _ => "Sinhala",
        }
    }

    fn reply_for(utterance: &str) -> String {
        let language = Self::detect_language(utterance);
        let vocabulary = match language {
            "Tamil" => "நன்றி (nandri) - Thank you",
            "Sinhala" => "ස්තූතියි (sthuthiyi) - Thank you",
            _ => "வணக்கம் (vanakkam) - Hello",
        };

        json!({
            "language_used": language,
            "ai_response": format!("You said: {utterance}"),
            "feedback": {
                "is_correct": true,
                "error_type": "None",
                "user_original": utterance,
                "correction": "",
                "explanation": ""
            },
            "vocabulary_suggestion": vocabulary,
            "code_example": null
        })
        .to_string()
    }
}

impl Default for MockModelGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelGateway for MockModelGateway {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let utterance = self.assembler.utterance_of(prompt);
        debug!("MockModelGateway: answering {} chars", utterance.len());

        let body = Self::reply_for(utterance);
        if self.fenced {
            Ok(format!("```json\n{body}\n```"))
        } else {
            Ok(body)
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
