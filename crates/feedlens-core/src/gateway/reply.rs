//! Model reply normalization
//!
//! Models are told to answer with bare JSON but often wrap it in a markdown
//! code fence anyway. The fence (and its optional language tag) is removed
//! before parsing.

use serde::de::DeserializeOwned;

use super::GatewayError;

/// Trim the reply and remove a surrounding code fence, if any
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Language tag sits directly after the opening fence: ```json
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parse a raw model reply into `T`
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Result<T, GatewayError> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(cleaned).map_err(|e| GatewayError::Parse {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}
