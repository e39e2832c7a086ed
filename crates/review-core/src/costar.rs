//! COSTAR context extractor.
//!
//! Non-exclusive keyword classification producing the six-field context
//! profile.  Each field is computed independently; the result is advisory
//! metadata for the score calculator and the rewrite persona-shaping, and
//! is never consulted by the verdict machine.

use crate::report::CostarProfile;
use crate::vocabulary::Vocabulary;

/// Infer a [`CostarProfile`] from the prompt text.
pub fn extract(vocab: &Vocabulary, text: &str) -> CostarProfile {
    let lower = text.to_lowercase();

    let mut context = String::new();
    if lower.contains("ai")
        || lower.contains("artificial intelligence")
        || lower.contains("machine learning")
    {
        context.push_str("AI");
    }
    if lower.contains("wifi") || lower.contains("wi-fi") || lower.contains("network") {
        if !context.is_empty() {
            context.push_str(", ");
        }
        context.push_str("Network");
    }

    let mut objective = String::new();
    if vocab.objective_explain.is_match(&lower) {
        objective = "Explain".to_string();
    }
    if vocab.objective_generate.is_match(&lower) {
        objective = "Generate".to_string();
    }

    let mut style = String::new();
    if lower.contains("tweet") {
        style = "Tweet-length".to_string();
    }

    let mut tone = String::new();
    if lower.contains("funny") || lower.contains("humor") || lower.contains("joke") {
        tone = "Humorous".to_string();
    }
    if lower.contains("formal") || lower.contains("professional") {
        tone = "Professional".to_string();
    }

    let mut audience = String::new();
    if lower.contains("student") {
        audience = "Students".to_string();
    }
    if lower.contains("twitter") || lower.contains("tweet") {
        audience = "Twitter readers".to_string();
    }

    let mut response = String::new();
    if vocab.response_code.is_match(&lower) {
        response = "Code".to_string();
    }
    if vocab.response_summary.is_match(&lower) {
        response = "Summary".to_string();
    }
    if response.is_empty() && !objective.is_empty() {
        response = objective.clone();
    }

    CostarProfile {
        context: non_empty_or(context, "None"),
        objective: non_empty_or(objective, "None"),
        style: non_empty_or(style, "None"),
        tone: non_empty_or(tone, "None"),
        audience: non_empty_or(audience, "General"),
        response: non_empty_or(response, "Text"),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
