//! Feedback module - Core types and data structures
//!
//! - Persisted feedback records and their insert form
//! - The closed sentiment label set
//! - Query filters
//! - Sentiment statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::FeedbackAnalysis;

/// Product label used when the caller does not supply one
pub const DEFAULT_PRODUCT: &str = "default-product";

// ============================================================================
// SENTIMENT
// ============================================================================

/// Sentiment classification label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All known labels, in reporting order
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Lenient parse of a stored or model-produced label.
    ///
    /// Returns `None` for anything outside the closed set.
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(format!("Unknown sentiment: {}", s)),
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// A persisted, analyzed feedback submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    /// Storage-assigned identifier
    pub id: i64,
    /// Text exactly as submitted
    pub text_original: String,
    /// English translation from the gateway
    pub text_translated: String,
    /// Sentiment label (semantically one of [`Sentiment`])
    pub sentiment: String,
    /// ISO 639-1 code of the detected source language
    pub language: String,
    /// Caller-supplied product label
    pub product: String,
    /// Insertion time, assigned by storage
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Parsed sentiment, if the stored label is a known one
    pub fn sentiment_label(&self) -> Option<Sentiment> {
        Sentiment::from_label(&self.sentiment)
    }
}

/// Insert form of a feedback record (no id, no timestamp)
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub text_original: String,
    pub text_translated: String,
    pub sentiment: String,
    pub language: String,
    pub product: String,
}

impl NewFeedback {
    /// Combine the submitted text and product with the gateway's derived fields.
    ///
    /// A missing or blank product falls back to [`DEFAULT_PRODUCT`].
    pub fn from_analysis(
        text_original: String,
        product: Option<String>,
        analysis: FeedbackAnalysis,
    ) -> Self {
        let product = product
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT.to_string());

        Self {
            text_original,
            text_translated: analysis.translated_text,
            sentiment: analysis.sentiment,
            language: analysis.language,
            product,
        }
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Optional equality filters for listing feedback
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedbackFilter {
    pub language: Option<String>,
    pub product: Option<String>,
}

impl FeedbackFilter {
    /// Filter with blank values dropped, so `?language=` means "any language"
    pub fn normalized(&self) -> Self {
        fn keep(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            language: keep(&self.language),
            product: keep(&self.product),
        }
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Sentiment distribution across all stored feedback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub total: i64,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    pub percent_positive: f64,
    pub percent_neutral: f64,
    pub percent_negative: f64,
}

impl SentimentStats {
    /// Build from a total and grouped `(label, count)` rows.
    ///
    /// Labels outside the closed set only contribute to `total`.
    pub fn from_counts<I, S>(total: i64, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut stats = Self {
            total,
            ..Default::default()
        };

        for (label, count) in counts {
            match Sentiment::from_label(label.as_ref()) {
                Some(Sentiment::Positive) => stats.positive += count,
                Some(Sentiment::Neutral) => stats.neutral += count,
                Some(Sentiment::Negative) => stats.negative += count,
                None => {}
            }
        }

        stats.percent_positive = percent(stats.positive, total);
        stats.percent_neutral = percent(stats.neutral, total);
        stats.percent_negative = percent(stats.negative, total);
        stats
    }

    /// Count for one known sentiment
    pub fn count(&self, sentiment: Sentiment) -> i64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    /// Percentage for one known sentiment
    pub fn percent(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.percent_positive,
            Sentiment::Neutral => self.percent_neutral,
            Sentiment::Negative => self.percent_negative,
        }
    }
}

/// Share of `total`, in percent, rounded to two decimals; 0.0 for an empty table
fn percent(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    // Decimal rounding of the exact binary value, ties to even: 1 of 800 is 0.12
    format!("{:.2}", raw).parse().unwrap_or(raw)
}
