//! Inbound GitHub webhook: authenticate, decide, spawn.
//!
//! Steps:
//! 1. Verify the `X-Hub-Signature-256` HMAC when a secret is configured
//! 2. Decode the event payload
//! 3. Apply the trigger policy
//! 4. Spawn the review task and return 200 immediately
//!
//! The review runs fire-and-forget: one tokio task per accepted event, no
//! bound and no per-PR lock, so two rapid deliveries for the same PR can run
//! concurrently. Task failures are logged and never reach the caller — the
//! response has already been sent.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{error, info, warn};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};
use crate::routes::webhook::event::{WebhookEvent, should_trigger_review};

type HmacSha256 = Hmac<Sha256>;

/// POST /webhook — GitHub `pull_request` events.
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // --- Signature ---------------------------------------------------------
    // An empty secret disables verification entirely. That mode is insecure
    // and only acceptable for local development.
    if !state.webhook_secret.is_empty() {
        let signature = headers
            .get("X-Hub-Signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if let Err(reason) = verify_signature(&body, state.webhook_secret.as_bytes(), signature) {
            warn!(reason, "webhook signature verification failed");
            return ApiResponse::error("UNAUTHORIZED", "Invalid webhook signature.")
                .into_response_with_status(StatusCode::UNAUTHORIZED);
        }
    }

    // --- Decode ------------------------------------------------------------
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "failed to decode webhook payload");
            return ApiResponse::error("BAD_REQUEST", "Malformed JSON payload.")
                .into_response_with_status(StatusCode::BAD_REQUEST);
        }
    };

    // --- Trigger decision --------------------------------------------------
    let Some(pr) = event.pull_request.as_ref() else {
        return ApiResponse::ok("Event ignored.").into_response_with_status(StatusCode::OK);
    };

    if !should_trigger_review(&event.action, pr) {
        info!(
            action = %event.action,
            number = pr.number,
            "ignoring action"
        );
        return ApiResponse::ok("Event ignored.").into_response_with_status(StatusCode::OK);
    }

    let Some(req) = event.to_review_request() else {
        return ApiResponse::ok("Event ignored.").into_response_with_status(StatusCode::OK);
    };

    info!(
        action = %event.action,
        owner = %req.owner,
        repo = %req.repo,
        number = req.number,
        "review triggered"
    );

    // --- Fire-and-forget ---------------------------------------------------
    let reviewer = state.reviewer.clone();
    tokio::spawn(async move {
        if let Err(e) = pr_reviewer::run_review(&reviewer, req).await {
            error!(error = %e, "review task failed");
        }
    });

    ApiResponse::ok("Review started.").into_response_with_status(StatusCode::OK)
}

/// Verify the HMAC-SHA256 signature of the raw request body.
///
/// Compares the `sha256=...` header digest against the body's HMAC under the
/// shared secret; comparison is constant-time via `verify_slice`.
fn verify_signature(body: &[u8], secret: &[u8], signature_header: &str) -> Result<(), &'static str> {
    let hex_digest = signature_header
        .strip_prefix("sha256=")
        .ok_or("missing sha256= prefix")?;

    let expected = hex::decode(hex_digest).map_err(|_| "invalid hex in signature")?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| "invalid hmac key")?;
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| "digest mismatch")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(body: &[u8], secret: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn correct_signature_validates() {
        let body = b"{\"action\":\"opened\"}";
        let secret = b"hush";
        let header = sign(body, secret);
        assert!(verify_signature(body, secret, &header).is_ok());
    }

    #[test]
    fn mutated_body_invalidates() {
        let secret = b"hush";
        let header = sign(b"{\"action\":\"opened\"}", secret);
        // One-byte change in the body must break the digest.
        assert!(verify_signature(b"{\"action\":\"opened \"}", secret, &header).is_err());
    }

    #[test]
    fn mutated_digest_invalidates() {
        let body = b"payload";
        let secret = b"hush";
        let mut header = sign(body, secret);
        // Flip the last hex nibble.
        let last = header.pop().unwrap();
        header.push(if last == '0' { '1' } else { '0' });
        assert!(verify_signature(body, secret, &header).is_err());
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let body = b"payload";
        let secret = b"hush";
        let header = sign(body, secret);
        let bare = header.strip_prefix("sha256=").unwrap();
        assert_eq!(
            verify_signature(body, secret, bare),
            Err("missing sha256= prefix")
        );
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        assert_eq!(
            verify_signature(b"payload", b"hush", "sha256=zz-not-hex"),
            Err("invalid hex in signature")
        );
    }

    #[test]
    fn wrong_secret_invalidates() {
        let body = b"payload";
        let header = sign(body, b"hush");
        assert!(verify_signature(body, b"other", &header).is_err());
    }
}
