//! WhatsApp webhook endpoint handlers
//!
//! This module handles incoming webhook requests from WhatsApp Business API.
//! It implements both the verification endpoint (GET) and the webhook receiver (POST).
//!
//! # Security
//!
//! When `APP_SECRET` is configured the POST endpoint rejects deliveries whose
//! `X-Hub-Signature-256` header does not match the raw body.

use super::{handler, security};
use crate::{
    consts,
    front::{AppState, errors},
    metric,
};
use ntex::{util::Bytes, web};
use serde::Deserialize;

/// Query parameters for webhook verification
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl VerifyQuery {
    /// Returns the challenge to send back if the handshake is valid
    pub fn accepted_challenge(&self, is_valid_token: impl Fn(&str) -> bool) -> Option<&str> {
        let mode_ok = self.mode.as_deref() == Some(consts::SUBSCRIBE_MODE);
        let token_ok = self.verify_token.as_deref().is_some_and(is_valid_token);

        (mode_ok && token_ok).then(|| self.challenge.as_deref().unwrap_or_default())
    }
}

/// Webhook verification endpoint (GET)
///
/// WhatsApp sends a GET request to verify the webhook URL.
/// This endpoint validates the verify token and returns the challenge.
///
/// # Query Parameters
/// - `hub.mode` - Should be "subscribe"
/// - `hub.verify_token` - Token configured in WhatsApp dashboard
/// - `hub.challenge` - Challenge string to echo back
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 403 if verification fails
#[web::get("")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    logfire::info!(
        "Received webhook verification request: mode={mode}",
        mode = query.mode.clone().unwrap_or_default()
    );

    let Some(challenge) =
        query.accepted_challenge(|token| app_state.config.verify_token_matches(token))
    else {
        metric::incr_handshake_statds("rejected");
        return Err(errors::UserError::Forbidden.into());
    };

    metric::incr_handshake_statds("verified");
    logfire::info!("Webhook verification successful");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge.to_string()))
}

/// Webhook receiver endpoint (POST)
///
/// Receives webhook events from WhatsApp Business API and answers text
/// messages before acknowledging.
///
/// # Returns
/// - 200 `{"status":"success"}` once processing finishes, including when
///   nothing was answered
/// - 403 if signature verification is enabled and fails
/// - 500 `{"detail": ...}` if the body is not JSON or an outbound call fails
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    if let Some(app_secret) = app_state.config.app_secret.as_deref() {
        let signature = req
            .headers()
            .get(consts::SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !security::verify_signature(signature, &body, app_secret) {
            metric::incr_webhook_outcome_statds("rejected");
            return Err(errors::UserError::Forbidden.into());
        }
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        metric::incr_webhook_outcome_statds("failed");
        errors::ServerError::InternalServerError(e.to_string())
    })?;

    logfire::info!(
        "Received webhook: object={object}",
        object = payload
            .get("object")
            .and_then(|object| object.as_str())
            .unwrap_or_default()
            .to_string()
    );

    match handler::process_webhook(&payload, app_state.sender.as_ref()).await {
        Ok(outcome) => metric::incr_webhook_outcome_statds(outcome.label()),
        Err(e) => {
            metric::incr_webhook_outcome_statds("failed");
            return Err(errors::ServerError::ExternalServiceError(format!("{e:#}")).into());
        }
    }

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "success"
    })))
}
