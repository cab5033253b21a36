//! API error responses
//!
//! Every failure leaves the handler as a `{"detail": "..."}` body. Gateway
//! and storage failures are logged with full detail here and reach the
//! client only as a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use feedlens_core::{GatewayError, StorageError};
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or empty required field
    #[error("{0}")]
    Validation(String),
    /// Body was not the expected JSON
    #[error(transparent)]
    Body(#[from] JsonRejection),
    /// Query string could not be decoded
    #[error(transparent)]
    Query(#[from] QueryRejection),
    /// Model call or reply parsing failed
    #[error("{detail}: {source}")]
    Gateway {
        detail: &'static str,
        source: GatewayError,
    },
    /// Database failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn gateway(detail: &'static str, source: GatewayError) -> Self {
        ApiError::Gateway { detail, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::Gateway { .. } | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Query(rejection) => rejection.body_text(),
            ApiError::Gateway { detail, .. } => detail.to_string(),
            ApiError::Storage(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Gateway { detail, source } => {
                error!(error = %source, "{}", detail);
            }
            ApiError::Storage(e) => error!("Storage failure: {}", e),
            other => warn!(status = other.status().as_u16(), "Rejected request: {}", other),
        }

        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
