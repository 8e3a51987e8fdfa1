//! API error handling
//!
//! Consistent JSON error responses for rejected deliveries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use webhook::VerificationResult;

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Signature present but does not match the body
    InvalidSignature,
    /// No `sha256=` signature in the header
    MalformedSignature(&'static str),
}

impl ApiError {
    /// Rejection for a failed verification, `None` when the delivery is valid
    pub fn from_verification(result: VerificationResult) -> Option<Self> {
        match result {
            VerificationResult::Valid => None,
            VerificationResult::Invalid => Some(ApiError::InvalidSignature),
            VerificationResult::Malformed(reason) => Some(ApiError::MalformedSignature(reason)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = match self {
            ApiError::InvalidSignature => ErrorResponse {
                error: "Invalid webhook signature".to_string(),
                code: "invalid_signature",
            },
            ApiError::MalformedSignature(reason) => ErrorResponse {
                error: format!("Malformed webhook signature: {}", reason),
                code: "malformed_signature",
            },
        };

        (StatusCode::UNAUTHORIZED, Json(response)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
