//! Text-Analysis Gateway
//!
//! Turns free text plus a task directive into exactly one call to a remote
//! generative model, then parses the reply into a fixed structure:
//!
//! - Full analysis: `{language, translated_text, sentiment}`
//! - Translation: `{translated_text}`
//!
//! The model itself sits behind [`LanguageModel`] so the gateway can run
//! against [`GeminiClient`] in production and a scripted fake in tests.
//! Nothing is retried.

mod gemini;
pub mod prompt;
pub mod reply;

pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling temperature used for every gateway call
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Target language when a translation request names none
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failure raised by a [`LanguageModel`] call
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Network or TLS failure talking to the provider
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Provider answered with a non-success status
    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Provider answered but produced no text (blocked, empty candidate)
    #[error("Model returned no text: {0}")]
    EmptyReply(String),
    /// Model not reachable for any other reason
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

/// Gateway error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Input text was empty or whitespace
    #[error("Input text is empty")]
    EmptyInput,
    /// The remote call itself failed
    #[error("Model call failed: {0}")]
    Call(#[from] ModelError),
    /// The reply was not the JSON shape we asked for
    #[error("Unparseable model reply: {reason}")]
    Parse { reason: String, raw: String },
}

/// Gateway result type
pub type Result<T> = std::result::Result<T, GatewayError>;

// ============================================================================
// MODEL CAPABILITY
// ============================================================================

/// Provider safety filter handling for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafetyPolicy {
    /// Provider defaults
    #[default]
    Default,
    /// Harassment, hate speech, sexual and dangerous-content filters off,
    /// so offensive feedback is classified rather than suppressed
    Unfiltered,
}

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub safety: SafetyPolicy,
}

/// A remote generative model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one generation and return the reply text
    async fn generate(&self, request: &GenerationRequest) -> std::result::Result<String, ModelError>;

    /// Model identifier, for logs and health output
    fn name(&self) -> &str;
}

// ============================================================================
// GATEWAY TYPES
// ============================================================================

/// What the gateway should ask the model for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Language, English translation and sentiment
    FullAnalysis,
    /// Translation only
    Translate { target_language: String },
}

/// Parsed full-analysis reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    pub language: String,
    pub translated_text: String,
    pub sentiment: String,
}

/// Parsed translation reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub translated_text: String,
}

// ============================================================================
// GATEWAY
// ============================================================================

/// Prompt builder, model caller and reply parser
#[derive(Clone)]
pub struct Gateway {
    model: Arc<dyn LanguageModel>,
}

impl Gateway {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Direct access to the model, for callers that want the raw reply
    pub fn model(&self) -> &Arc<dyn LanguageModel> {
        &self.model
    }

    /// Shape the generation request for `text` under `mode`
    pub fn request_for(text: &str, mode: &AnalysisMode) -> GenerationRequest {
        match mode {
            AnalysisMode::FullAnalysis => GenerationRequest {
                prompt: prompt::feedback_analysis(text),
                temperature: SAMPLING_TEMPERATURE,
                safety: SafetyPolicy::Unfiltered,
            },
            AnalysisMode::Translate { target_language } => GenerationRequest {
                prompt: prompt::translation(text, target_language),
                temperature: SAMPLING_TEMPERATURE,
                safety: SafetyPolicy::Default,
            },
        }
    }

    /// Detect language, translate to English and classify sentiment
    pub async fn analyze_feedback(&self, text: &str) -> Result<FeedbackAnalysis> {
        let mut analysis: FeedbackAnalysis =
            self.run(text, &AnalysisMode::FullAnalysis).await?;

        // "Positive" and "positive" must land in the same stats bucket
        analysis.sentiment = analysis.sentiment.trim().to_lowercase();
        analysis.language = analysis.language.trim().to_string();
        Ok(analysis)
    }

    /// Translate `text` into `target_language`
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<Translation> {
        let mode = AnalysisMode::Translate {
            target_language: target_language.to_string(),
        };
        self.run(text, &mode).await
    }

    async fn run<T>(&self, text: &str, mode: &AnalysisMode) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }

        let request = Self::request_for(text, mode);
        let raw = self.model.generate(&request).await?;
        tracing::debug!(model = self.model.name(), mode = ?mode, "Raw model reply: {}", raw);

        reply::parse_reply(&raw)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("model", &self.model.name())
            .finish()
    }
}
