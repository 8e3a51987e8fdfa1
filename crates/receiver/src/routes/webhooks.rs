//! Webhook routes

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue},
    Json,
};
use common::VerificationMode;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webhook::{AlertPayload, VerificationResult, SIGNATURE_HEADER, SIGNATURE_PREFIX};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct WebhookResponse {
    status: &'static str,
}

pub async fn kline(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let diagnostic = state.config.mode == VerificationMode::Diagnostic;

    // Only a missing header is empty; non-UTF-8 octets are kept as bytes
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default();

    let result = state.verifier.verify(&body, signature);

    if diagnostic {
        debug!("Headers: {:?}", headers);
        debug!("Body: {}", String::from_utf8_lossy(&body));
        debug!(
            "Expected signature: {}, received signature: {}",
            state.verifier.compute(&body),
            String::from_utf8_lossy(
                signature
                    .strip_prefix(SIGNATURE_PREFIX.as_bytes())
                    .unwrap_or(signature)
            )
        );
    }

    match result {
        VerificationResult::Valid => info!("Webhook signature valid ({} bytes)", body.len()),
        VerificationResult::Invalid => warn!("Invalid webhook signature"),
        VerificationResult::Malformed(reason) => warn!("Malformed webhook signature: {}", reason),
    }

    if should_inspect(result, state.config.mode) {
        log_alert(&body, result.is_valid());
    }

    if let Some(rejection) = ApiError::from_verification(result) {
        if !diagnostic {
            return Err(rejection);
        }
        warn!("Diagnostic mode: accepting delivery with {} signature", result);
    }

    Ok(Json(WebhookResponse { status: "received" }))
}

/// Whether the body is worth parsing and logging as an alert
///
/// Unauthenticated bodies are only inspected in diagnostic mode.
fn should_inspect(result: VerificationResult, mode: VerificationMode) -> bool {
    result.is_valid() || mode == VerificationMode::Diagnostic
}

fn log_alert(body: &[u8], verified: bool) {
    let alert = match AlertPayload::parse(body) {
        Ok(alert) => alert,
        Err(e) => {
            warn!("Invalid JSON body: {}", e);
            return;
        }
    };

    let id = alert.id.as_deref().unwrap_or("-");
    let symbol = alert.symbol.as_deref().unwrap_or("-");
    let kind = alert.kind.as_deref().unwrap_or("-");
    let ts = alert
        .ts
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());

    if verified {
        info!(id, symbol, kind, strength = ?alert.strength, ts = %ts, "Alert received");
    } else {
        warn!(id, symbol, kind, strength = ?alert.strength, ts = %ts, "Unverified alert payload");
    }
}
