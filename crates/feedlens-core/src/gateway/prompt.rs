//! Prompt templates
//!
//! Both prompts embed the caller's text verbatim between triple quotes and
//! demand a bare JSON object back.

/// Full analysis: language detection, English translation, sentiment
pub fn feedback_analysis(text: &str) -> String {
    format!(
        r#"You are a multilingual feedback analyzer API.

Given this customer feedback:
"""{text}"""

Perform:
1. Detect the language (use ISO 639-1 code only, e.g., "en", "fr", "ar").
2. Translate the feedback to English.
3. Analyze the sentiment: "positive", "neutral", or "negative".

Respond ONLY with this valid JSON object - no explanation, no markdown:
{{
  "language": "xx",
  "translated_text": "...",
  "sentiment": "..."
}}
"#
    )
}

/// Translation only, into `target_language`
pub fn translation(text: &str, target_language: &str) -> String {
    format!(
        r#"You are a translation API.

Translate the following text to {target_language}:
"""{text}"""

Respond ONLY with a valid JSON like this (no explanation, no markdown):
{{
  "translated_text": "..."
}}
"#
    )
}
