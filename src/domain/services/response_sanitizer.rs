const FENCE: &str = "```";

/// Strips incidental markdown wrapping from raw model text.
///
/// Removes at most one leading fence (with or without a language tag such as
/// `json`) and at most one trailing fence, then trims. Interior fences are
/// left alone.
pub struct ResponseSanitizer;

impl ResponseSanitizer {
    pub fn sanitize(raw: &str) -> String {
        let mut text = raw.trim();

        if let Some(rest) = text.strip_prefix(FENCE) {
            // The language tag runs up to the first character that cannot be
            // part of an identifier, usually the newline after ```json.
            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .unwrap_or(rest.len());
            text = &rest[tag_len..];
        }

        if let Some(rest) = text.strip_suffix(FENCE) {
            text = rest;
        }

        text.trim().to_string()
    }
}
