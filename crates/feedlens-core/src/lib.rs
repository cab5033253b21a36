//! # Feedlens Core
//!
//! Multilingual customer feedback analysis engine:
//!
//! - **Gateway**: prompt shaping, a single Gemini call, and tolerant JSON reply parsing
//! - **Storage**: SQLite feedback table with versioned migrations
//! - **Statistics**: sentiment counts and rounded percentages
//! - **Configuration**: environment-driven settings, loaded once and passed explicitly
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use feedlens_core::{Config, Gateway, GeminiClient, NewFeedback, Storage};
//!
//! let config = Config::from_env()?;
//! let storage = Storage::open(&config.database.url)?;
//! let gateway = Gateway::new(Arc::new(GeminiClient::new(config.gemini)?));
//!
//! let analysis = gateway.analyze_feedback("Ce produit est génial !").await?;
//! let record = storage.insert_feedback(NewFeedback::from_analysis(
//!     "Ce produit est génial !".to_string(),
//!     None,
//!     analysis,
//! ))?;
//! println!("{} -> {}", record.id, record.sentiment);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod feedback;
pub mod gateway;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Configuration
pub use config::{Config, ConfigError, DatabaseConfig};

// Feedback types
pub use feedback::{
    FeedbackFilter, FeedbackRecord, NewFeedback, Sentiment, SentimentStats, DEFAULT_PRODUCT,
};

// Gateway
pub use gateway::{
    AnalysisMode, FeedbackAnalysis, Gateway, GatewayError, GeminiClient, GeminiConfig,
    GenerationRequest, LanguageModel, ModelError, SafetyPolicy, Translation,
    DEFAULT_TARGET_LANGUAGE, SAMPLING_TEMPERATURE,
};

// Storage layer
pub use storage::{Result, Storage, StorageError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
