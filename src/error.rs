//! API error taxonomy.
//!
//! Three failure classes cross the HTTP boundary:
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | `Validation` | 400 | `{ "error": ..., "errorCode": "VALIDATION_ERROR" }` |
//! | `NotFound` | 404 | `{ "success": false, "error": ... }` |
//! | `Dependency` | 500 | `{ "error": <localized apology>, "errorCode": "PROCESSING_ERROR" }` |
//!
//! Dependency failures carry the underlying cause for logging but surface
//! only a localized apology and a stable code to the caller — never a raw
//! error string. The language detector has no error class at all: it is a
//! total function.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::language::LanguageCode;
use crate::prompts;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A collaborator (store or model) failed. The request language picks
    /// the apology shown to the caller.
    #[error("dependency failure: {source}")]
    Dependency {
        language: LanguageCode,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn dependency(language: LanguageCode, source: anyhow::Error) -> Self {
        ApiError::Dependency { language, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": message,
                    "errorCode": "VALIDATION_ERROR",
                })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "success": false,
                    "error": message,
                })),
            )
                .into_response(),
            ApiError::Dependency { language, source } => {
                tracing::error!("dependency failure: {:#}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": prompts::apology(language),
                        "errorCode": "PROCESSING_ERROR",
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let resp = ApiError::validation("message is required").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::not_found("Scheme not found").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::dependency(LanguageCode::Hi, anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
