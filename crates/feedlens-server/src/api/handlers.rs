//! API endpoint handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use feedlens_core::{
    FeedbackFilter, FeedbackRecord, NewFeedback, SentimentStats, DEFAULT_TARGET_LANGUAGE,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::error::ApiError;
use super::state::AppState;

/// Client-facing message for a failed analysis
pub const ANALYSIS_FAILED: &str = "Gemini API error occurred";
/// Client-facing message for a failed translation
pub const TRANSLATION_FAILED: &str = "Translation failed.";
/// Client-facing message for a missing `text`
pub const TEXT_REQUIRED: &str = "Text is required";

/// Reject absent or blank text before anything reaches the model
fn required_text(text: Option<String>) -> Result<String, ApiError> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(TEXT_REQUIRED.to_string()))
}

// ============================================================================
// FEEDBACK
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FeedbackInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

/// Ingestion response
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackCreated {
    pub id: i64,
    pub original: String,
    pub translated: String,
    pub sentiment: String,
    pub language: String,
    pub product: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackCreated {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id,
            original: record.text_original,
            translated: record.text_translated,
            sentiment: record.sentiment,
            language: record.language,
            product: record.product,
            created_at: record.created_at,
        }
    }
}

/// Analyze and store one feedback submission
pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackInput>, JsonRejection>,
) -> Result<Json<FeedbackCreated>, ApiError> {
    let Json(input) = payload?;
    let text = required_text(input.text)?;
    info!(product = ?input.product, chars = text.chars().count(), "Incoming feedback");

    let analysis = state
        .gateway
        .analyze_feedback(&text)
        .await
        .map_err(|e| ApiError::gateway(ANALYSIS_FAILED, e))?;

    let record = state
        .storage
        .insert_feedback(NewFeedback::from_analysis(text, input.product, analysis))?;

    Ok(Json(record.into()))
}

/// List stored feedback, newest first
pub async fn list_feedback(
    State(state): State<AppState>,
    params: Result<Query<FeedbackFilter>, QueryRejection>,
) -> Result<Json<Vec<FeedbackRecord>>, ApiError> {
    let Query(filter) = params?;
    let records = state.storage.list_feedback(&filter)?;
    Ok(Json(records))
}

// ============================================================================
// STATS
// ============================================================================

/// Sentiment distribution
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<SentimentStats>, ApiError> {
    let stats = state.storage.sentiment_stats()?;
    Ok(Json(stats))
}

// ============================================================================
// TRANSLATION
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TranslateInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub original: String,
    pub translated_text: String,
    pub target_language: String,
}

/// Stateless translation through the gateway
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateInput>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(input) = payload?;
    let text = required_text(input.text)?;
    let target_language = input
        .target_language
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());

    let translation = state
        .gateway
        .translate(&text, &target_language)
        .await
        .map_err(|e| ApiError::gateway(TRANSLATION_FAILED, e))?;

    Ok(Json(TranslateResponse {
        original: text,
        translated_text: translation.translated_text,
        target_language,
    }))
}

// ============================================================================
// HEALTH
// ============================================================================

/// Health check
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let total = state.storage.count_feedback()?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "totalFeedback": total,
        "model": state.gateway.model_name(),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
