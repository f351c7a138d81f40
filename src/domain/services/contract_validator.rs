use serde_json::{Map, Value};

use super::fallback_synthesizer::{FallbackSynthesizer, UNKNOWN_LANGUAGE};
use crate::domain::{DomainError, ErrorType, Feedback, TutorResponse};

const DEFAULT_AI_RESPONSE: &str = "Thank you for your message! \
I'm here to help you practice Tamil, Sinhala, and English. What would you like to learn today?";

const DEFAULT_VOCABULARY: &str =
    "Keep practicing! Every conversation helps improve your language skills.";

/// Older instruction sets asked the model for the explanation under this key.
const LEGACY_EXPLANATION_KEY: &str = "tamil_explanation";

/// Outcome of validating one model reply: the repaired response plus what
/// had to be substituted along the way.
#[derive(Debug)]
pub struct ContractReport {
    response: TutorResponse,
    repaired_fields: Vec<&'static str>,
    fallback_cause: Option<DomainError>,
}

impl ContractReport {
    pub fn response(&self) -> &TutorResponse {
        &self.response
    }

    pub fn into_response(self) -> TutorResponse {
        self.response
    }

    /// Contract fields that were missing or invalid and got a default.
    pub fn repaired_fields(&self) -> &[&'static str] {
        &self.repaired_fields
    }

    /// Set when the text could not be parsed and the constant fallback was used.
    pub fn fallback_cause(&self) -> Option<&DomainError> {
        self.fallback_cause.as_ref()
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback_cause.is_some()
    }

    pub fn is_clean(&self) -> bool {
        !self.used_fallback() && self.repaired_fields.is_empty()
    }
}

/// Turns sanitized, untrusted model text into a fully populated
/// [`TutorResponse`].
///
/// Text that does not parse as a JSON object is replaced wholesale by
/// [`FallbackSynthesizer`]. A parsed object is repaired field by field: a
/// value of the right type is copied through, anything else is replaced by
/// that field's default. Content is never judged, only shape.
pub struct ContractValidator;

impl ContractValidator {
    pub fn validate(sanitized: &str) -> TutorResponse {
        Self::inspect(sanitized).into_response()
    }

    pub fn inspect(sanitized: &str) -> ContractReport {
        match serde_json::from_str::<Value>(sanitized) {
            Ok(value) => Self::inspect_value(&value),
            Err(e) => Self::fallback(DomainError::malformed_output(format!(
                "not valid JSON: {e}"
            ))),
        }
    }

    /// Same as [`ContractValidator::inspect`] for an already-deserialized tree.
    pub fn inspect_value(value: &Value) -> ContractReport {
        match value.as_object() {
            Some(object) => Self::repair(object),
            None => Self::fallback(DomainError::malformed_output(format!(
                "expected a JSON object, got {}",
                kind_of(value)
            ))),
        }
    }

    fn fallback(cause: DomainError) -> ContractReport {
        ContractReport {
            response: FallbackSynthesizer::synthesize(),
            repaired_fields: Vec::new(),
            fallback_cause: Some(cause),
        }
    }

    fn repair(object: &Map<String, Value>) -> ContractReport {
        let mut repairs = Repairs::default();
        let empty = Map::new();

        let language_used = repairs.take("language_used", string(object, "language_used"), || {
            UNKNOWN_LANGUAGE.to_string()
        });

        let ai_response = repairs.take("ai_response", non_blank(object, "ai_response"), || {
            DEFAULT_AI_RESPONSE.to_string()
        });

        let feedback_object = match object.get("feedback").and_then(Value::as_object) {
            Some(feedback) => feedback,
            None => {
                repairs.note("feedback");
                &empty
            }
        };
        let feedback = Self::repair_feedback(feedback_object, &mut repairs);

        let vocabulary_suggestion = repairs.take(
            "vocabulary_suggestion",
            non_blank(object, "vocabulary_suggestion"),
            || DEFAULT_VOCABULARY.to_string(),
        );

        let code_example = match object.get("code_example") {
            None | Some(Value::Null) => None,
            Some(Value::String(code)) if !code.trim().is_empty() => Some(code.clone()),
            Some(Value::String(_)) => None,
            Some(_) => {
                repairs.note("code_example");
                None
            }
        };

        ContractReport {
            response: TutorResponse {
                language_used,
                ai_response,
                feedback,
                vocabulary_suggestion,
                code_example,
            },
            repaired_fields: repairs.into_fields(),
            fallback_cause: None,
        }
    }

    fn repair_feedback(object: &Map<String, Value>, repairs: &mut Repairs) -> Feedback {
        let defaults = Feedback::neutral();

        let is_correct = repairs.take(
            "feedback.is_correct",
            object.get("is_correct").and_then(Value::as_bool),
            || defaults.is_correct,
        );

        let error_type = repairs.take(
            "feedback.error_type",
            string(object, "error_type").and_then(|label| ErrorType::from_label(&label)),
            || defaults.error_type,
        );

        let user_original = repairs.take(
            "feedback.user_original",
            string(object, "user_original"),
            String::new,
        );

        let correction =
            repairs.take("feedback.correction", string(object, "correction"), String::new);

        let explanation = repairs.take(
            "feedback.explanation",
            string(object, "explanation").or_else(|| string(object, LEGACY_EXPLANATION_KEY)),
            String::new,
        );

        Feedback {
            is_correct,
            error_type,
            user_original,
            correction,
            explanation,
        }
    }
}

/// Records which fields were defaulted during a repair pass.
#[derive(Default)]
struct Repairs {
    fields: Vec<&'static str>,
}

impl Repairs {
    fn take<T>(&mut self, field: &'static str, value: Option<T>, default: impl FnOnce() -> T) -> T {
        match value {
            Some(value) => value,
            None => {
                self.note(field);
                default()
            }
        }
    }

    fn note(&mut self, field: &'static str) {
        self.fields.push(field);
    }

    fn into_fields(self) -> Vec<&'static str> {
        self.fields
    }
}

fn string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_blank(object: &Map<String, Value>, key: &str) -> Option<String> {
    string(object, key).filter(|s| !s.trim().is_empty())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_reply() -> Value {
        json!({
            "language_used": "English",
            "ai_response": "அருமை! Let's practice introductions.",
            "feedback": {
                "is_correct": false,
                "error_type": "Grammar",
                "user_original": "I has a book",
                "correction": "I have a book",
                "explanation": "'I' உடன் 'have' பயன்படுத்த வேண்டும்."
            },
            "vocabulary_suggestion": "என் பெயர் (en peyar) - My name is",
            "code_example": "print(\"என் பெயர் Sam\")"
        })
    }

    #[test]
    fn test_unparseable_text_yields_fallback() {
        for text in ["", "not json at all", "{\"language_used\":", "[1, 2", "{'a': 1}"] {
            let report = ContractValidator::inspect(text);
            assert!(report.used_fallback(), "expected fallback for {text:?}");
            assert_eq!(report.into_response(), FallbackSynthesizer::synthesize());
        }
    }

    #[test]
    fn test_non_object_json_yields_fallback() {
        for text in ["[]", "\"hello\"", "42", "true", "null"] {
            assert_eq!(
                ContractValidator::validate(text),
                FallbackSynthesizer::synthesize(),
                "expected fallback for {text}"
            );
        }
    }

    #[test]
    fn test_well_formed_reply_copied_verbatim() {
        let report = ContractValidator::inspect(&full_reply().to_string());
        assert!(report.is_clean());

        let response = report.into_response();
        assert_eq!(response.language_used, "English");
        assert_eq!(response.ai_response, "அருமை! Let's practice introductions.");
        assert!(!response.feedback.is_correct);
        assert_eq!(response.feedback.error_type, ErrorType::Grammar);
        assert_eq!(response.feedback.user_original, "I has a book");
        assert_eq!(response.feedback.correction, "I have a book");
        assert_eq!(response.vocabulary_suggestion, "என் பெயர் (en peyar) - My name is");
        assert_eq!(response.code_example.as_deref(), Some("print(\"என் பெயர் Sam\")"));
    }

    #[test]
    fn test_missing_feedback_and_code_example() {
        let text = r#"{"language_used":"Tamil","ai_response":"Hi","vocabulary_suggestion":"X"}"#;
        let response = ContractValidator::validate(text);

        assert_eq!(response.language_used, "Tamil");
        assert_eq!(response.ai_response, "Hi");
        assert_eq!(response.vocabulary_suggestion, "X");
        assert!(response.feedback.is_correct);
        assert_eq!(response.feedback.error_type, ErrorType::None);
        assert_eq!(response.feedback.user_original, "");
        assert_eq!(response.feedback.correction, "");
        assert_eq!(response.feedback.explanation, "");
        assert_eq!(response.code_example, None);
    }

    #[test]
    fn test_one_garbled_field_keeps_the_rest() {
        let mut reply = full_reply();
        reply["ai_response"] = json!(17);

        let report = ContractValidator::inspect(&reply.to_string());
        assert!(!report.used_fallback());
        assert_eq!(report.repaired_fields(), &["ai_response"]);

        let response = report.into_response();
        assert_eq!(response.ai_response, DEFAULT_AI_RESPONSE);
        assert_eq!(response.language_used, "English");
        assert_eq!(response.feedback.error_type, ErrorType::Grammar);
        assert!(response.code_example.is_some());
    }

    #[test]
    fn test_invalid_error_type_normalized_to_none() {
        let mut reply = full_reply();
        reply["feedback"]["error_type"] = json!("Foo");

        let response = ContractValidator::validate(&reply.to_string());
        assert_eq!(response.feedback.error_type, ErrorType::None);
        assert_eq!(response.feedback.correction, "I have a book");
    }

    #[test]
    fn test_is_correct_as_string_defaults_to_true() {
        let mut reply = full_reply();
        reply["feedback"]["is_correct"] = json!("false");

        let report = ContractValidator::inspect(&reply.to_string());
        assert_eq!(report.repaired_fields(), &["feedback.is_correct"]);
        assert!(report.response().feedback.is_correct);
    }

    #[test]
    fn test_feedback_not_an_object() {
        let mut reply = full_reply();
        reply["feedback"] = json!("looks good");

        let report = ContractValidator::inspect(&reply.to_string());
        assert!(report.repaired_fields().contains(&"feedback"));
        assert_eq!(report.response().feedback, Feedback::neutral());
    }

    #[test]
    fn test_wrong_typed_code_example_is_absent() {
        let mut reply = full_reply();
        reply["code_example"] = json!(42);

        let report = ContractValidator::inspect(&reply.to_string());
        assert_eq!(report.repaired_fields(), &["code_example"]);
        assert_eq!(report.response().code_example, None);
    }

    #[test]
    fn test_null_or_blank_code_example_is_absent() {
        let mut reply = full_reply();
        reply["code_example"] = Value::Null;
        assert_eq!(ContractValidator::validate(&reply.to_string()).code_example, None);

        reply["code_example"] = json!("   ");
        assert_eq!(ContractValidator::validate(&reply.to_string()).code_example, None);
    }

    #[test]
    fn test_blank_reply_and_vocabulary_get_defaults() {
        let mut reply = full_reply();
        reply["ai_response"] = json!("  ");
        reply["vocabulary_suggestion"] = json!("");

        let response = ContractValidator::validate(&reply.to_string());
        assert_eq!(response.ai_response, DEFAULT_AI_RESPONSE);
        assert_eq!(response.vocabulary_suggestion, DEFAULT_VOCABULARY);
    }

    #[test]
    fn test_empty_object_gets_every_default() {
        let report = ContractValidator::inspect("{}");
        assert!(!report.used_fallback());

        let response = report.response();
        assert_eq!(response.language_used, UNKNOWN_LANGUAGE);
        assert_eq!(response.ai_response, DEFAULT_AI_RESPONSE);
        assert_eq!(response.feedback, Feedback::neutral());
        assert_eq!(response.vocabulary_suggestion, DEFAULT_VOCABULARY);
        assert_eq!(response.code_example, None);
    }

    #[test]
    fn test_legacy_explanation_key_accepted() {
        let mut reply = full_reply();
        let feedback = reply["feedback"].as_object_mut().unwrap();
        feedback.remove("explanation");
        feedback.insert("tamil_explanation".to_string(), json!("விளக்கம்"));

        let response = ContractValidator::validate(&reply.to_string());
        assert_eq!(response.feedback.explanation, "விளக்கம்");
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut reply = full_reply();
        reply["confidence"] = json!(0.9);

        assert!(ContractValidator::inspect(&reply.to_string()).is_clean());
    }
}
