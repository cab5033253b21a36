//! Model reply fixtures
//!
//! Builders for the JSON bodies a well-behaved (or misbehaving) model would
//! return.

use serde_json::json;

/// Full-analysis reply
pub fn analysis_reply(language: &str, translated_text: &str, sentiment: &str) -> String {
    json!({
        "language": language,
        "translated_text": translated_text,
        "sentiment": sentiment,
    })
    .to_string()
}

/// Translation-only reply
pub fn translation_reply(translated_text: &str) -> String {
    json!({ "translated_text": translated_text }).to_string()
}

/// Wrap a reply in a markdown code fence, optionally tagged
pub fn fenced(reply: &str, tag: Option<&str>) -> String {
    format!("```{}\n{}\n```", tag.unwrap_or(""), reply)
}

/// A reply that ignores the JSON instruction entirely
pub fn prose_reply() -> String {
    "The customer seems happy overall, I would call this positive.".to_string()
}

/// Valid JSON missing the sentiment key
pub fn incomplete_analysis_reply() -> String {
    json!({ "language": "en", "translated_text": "ok" }).to_string()
}
