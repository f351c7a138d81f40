use std::sync::Arc;

/// Separates the instruction block from the learner's utterance.
pub const UTTERANCE_DELIMITER: &str = "\nUser's message: ";

/// Built-in instructions for the trilingual tutor.
pub const TUTOR_INSTRUCTIONS: &str = r#"Role: You are a friendly and patient trilingual tutor for Tamil, Sinhala, and English, teaching absolute beginners (A1/A2 level). Use simple vocabulary only.

Personality: Encouraging, enthusiastic, and supportive. Celebrate successes and guide gently through mistakes. Always try to help; never refuse to answer.

Language rule: If the user speaks Tamil, reply in English or Sinhala. If the user speaks Sinhala, reply in Tamil or English. If the user speaks English, reply in Tamil or Sinhala. Never use Hindi or any language other than Tamil, Sinhala, and English.

Output rule: Reply with a single valid JSON object and nothing else. No prose before or after it, no markdown, no code fences.

Guidelines:
1. Keep ai_response conversational, friendly, and educational (3-5 sentences).
2. When correcting, give specific and actionable feedback, and explain the correction simply in Tamil.
3. Suggest vocabulary that fits the conversation, with example usage.
4. When it helps, include a short, beginner-friendly, commented code example built around the phrase being learned.
5. End ai_response with an engaging question or learning prompt.
6. If the message is unclear, ask for clarification in a friendly way.
7. Add cultural context when it makes the lesson more interesting.

The JSON object must have exactly this structure:
{
  "language_used": "The language the user spoke in",
  "ai_response": "Your conversational reply in one of the other two languages.",
  "feedback": {
    "is_correct": true,
    "error_type": "Grammar, Pronunciation, or None",
    "user_original": "The user's original sentence.",
    "correction": "The corrected sentence.",
    "explanation": "A simple explanation of the correction in Tamil."
  },
  "vocabulary_suggestion": "A simple, relevant vocabulary suggestion with example usage.",
  "code_example": "A short code example related to the topic, or null"
}

Example:
User: "ஹலோ, எப்படி இருக்கிறீர்கள்?"
Reply:
{
  "language_used": "Tamil",
  "ai_response": "Hello! I'm doing well, thank you for asking. I'm here to help you practice Tamil, Sinhala, and English. What would you like to learn today?",
  "feedback": {
    "is_correct": true,
    "error_type": "None",
    "user_original": "",
    "correction": "",
    "explanation": ""
  },
  "vocabulary_suggestion": "ஹலோ (Hello) - A common greeting used worldwide",
  "code_example": "// Tamil greeting\nprint(\"ஹலோ! நான் நலமாக இருக்கிறேன்.\")\n// Translation: Hello! I am fine."
}

Example:
User: "I want to learn how to introduce myself"
Reply:
{
  "language_used": "English",
  "ai_response": "அருமை! You can say 'என் பெயர் [your name]', which means 'My name is [your name]'. You will use this phrase often. Would you like to practice it with your own name?",
  "feedback": {
    "is_correct": true,
    "error_type": "None",
    "user_original": "",
    "correction": "",
    "explanation": ""
  },
  "vocabulary_suggestion": "என் பெயர் (en peyar) - My name is",
  "code_example": "// Introducing yourself in Tamil\nname = \"[Your Name]\"\nprint(\"என் பெயர் \" + name)"
}
"#;

/// Joins the process-wide instruction block with a learner's utterance.
///
/// The instructions are fixed when the assembler is built and shared
/// read-only between requests.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    instructions: Arc<str>,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(TUTOR_INSTRUCTIONS)
    }
}

impl PromptAssembler {
    pub fn new(instructions: impl Into<Arc<str>>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// `instructions + delimiter + utterance`, verbatim.
    pub fn assemble(&self, utterance: &str) -> String {
        let mut prompt = String::with_capacity(
            self.instructions.len() + UTTERANCE_DELIMITER.len() + utterance.len(),
        );
        prompt.push_str(&self.instructions);
        prompt.push_str(UTTERANCE_DELIMITER);
        prompt.push_str(utterance);
        prompt
    }

    /// Recover the utterance from a prompt built by this assembler.
    ///
    /// Everything after the instructions and the first delimiter belongs to
    /// the utterance, even if the utterance itself contains the delimiter.
    /// Prompts built with other instructions fall back to the first
    /// delimiter.
    pub fn utterance_of<'p>(&self, prompt: &'p str) -> &'p str {
        prompt
            .strip_prefix(&*self.instructions)
            .and_then(|rest| rest.strip_prefix(UTTERANCE_DELIMITER))
            .or_else(|| {
                prompt
                    .split_once(UTTERANCE_DELIMITER)
                    .map(|(_, utterance)| utterance)
            })
            .unwrap_or(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_is_literal_concatenation() {
        let assembler = PromptAssembler::new("Be a tutor.");
        assert_eq!(
            assembler.assemble("வணக்கம்"),
            "Be a tutor.\nUser's message: வணக்கம்"
        );
    }

    #[test]
    fn test_assemble_keeps_utterance_untouched() {
        let assembler = PromptAssembler::default();
        let utterance = "  \"quoted\" ```json {} ```  ";
        let prompt = assembler.assemble(utterance);

        assert!(prompt.starts_with(TUTOR_INSTRUCTIONS));
        assert!(prompt.ends_with(utterance));
        assert_eq!(assembler.utterance_of(&prompt), utterance);
    }

    #[test]
    fn test_utterance_containing_delimiter_is_recovered_whole() {
        let assembler = PromptAssembler::new("Be a tutor.");
        let utterance = "first line\nUser's message: second part";
        let prompt = assembler.assemble(utterance);

        assert_eq!(assembler.utterance_of(&prompt), utterance);
        assert_eq!(PromptAssembler::default().utterance_of(&prompt), utterance);
    }

    #[test]
    fn test_default_instructions_describe_contract_keys() {
        let assembler = PromptAssembler::default();
        for key in [
            "language_used",
            "ai_response",
            "feedback",
            "vocabulary_suggestion",
            "code_example",
        ] {
            assert!(assembler.instructions().contains(key), "missing {key}");
        }
    }
}
