//! # Stripe Webhook Verification
//!
//! Verifies the `Stripe-Signature` header and parses the event envelope.
//! Only `checkout.session.completed` is acted upon; it carries the session id
//! that is then confirmed through the same path as the payer's redirect.

use chrono::{DateTime, Utc};
use hub_core::{HubError, HubResult, WebhookEvent, WebhookEventType};
use serde::Deserialize;
use tracing::debug;

/// Accepted clock skew between Stripe's signing time and ours
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Events that should be enabled in the Stripe Dashboard
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &["checkout.session.completed"];

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

/// Verify `payload` against `signature` and parse the event.
pub fn verify_and_parse(
    secret: &str,
    payload: &[u8],
    signature: &str,
    now: DateTime<Utc>,
) -> HubResult<WebhookEvent> {
    let header = parse_signature_header(signature)?;

    if (now.timestamp() - header.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(HubError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!("{}.{}", header.timestamp, String::from_utf8_lossy(payload));
    let expected = compute_hmac_sha256(secret, &signed_payload)?;

    if !header
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected))
    {
        return Err(HubError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    parse_event(payload)
}

fn parse_event(payload: &[u8]) -> HubResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| HubError::WebhookParseError(format!("Failed to parse webhook: {}", e)))?;

    debug!("Verified Stripe webhook: type={}", event.event_type);

    let event_type = match event.event_type.as_str() {
        "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
        other => WebhookEventType::Other(other.to_string()),
    };

    let session_id = match event_type {
        WebhookEventType::CheckoutCompleted => event
            .data
            .object
            .get("id")
            .and_then(|v| v.as_str())
            .map(String::from),
        WebhookEventType::Other(_) => None,
    };

    Ok(WebhookEvent {
        event_id: event.id,
        event_type,
        session_id,
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

fn parse_signature_header(header: &str) -> HubResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        HubError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(HubError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Hex HMAC-SHA256 of `message`, as Stripe computes the `v1` signature
pub fn compute_hmac_sha256(secret: &str, message: &str) -> HubResult<String> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| HubError::Configuration(format!("Invalid webhook secret: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "whsec_test";

    fn completed_payload() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "created": 1_700_000_000,
            "data": { "object": { "id": "cs_test_123", "payment_status": "paid" } }
        }))
        .unwrap()
    }

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let signed = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        format!("t={},v1={}", timestamp, compute_hmac_sha256(SECRET, &signed).unwrap())
    }

    #[test]
    fn test_parse_signature_header() {
        let parsed = parse_signature_header("t=1234567890,v1=abc123,v1=def456,v0=old").unwrap();
        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures, vec!["abc123", "def456"]);

        assert!(parse_signature_header("v1=abc").is_err());
        assert!(parse_signature_header("t=123").is_err());
    }

    #[test]
    fn test_valid_signature_yields_session_id() {
        let payload = completed_payload();
        let now = Utc::now();
        let event = verify_and_parse(SECRET, &payload, &sign(&payload, now.timestamp()), now).unwrap();

        assert_eq!(event.event_id, "evt_1");
        assert_eq!(event.event_type, WebhookEventType::CheckoutCompleted);
        assert_eq!(event.session_id.as_deref(), Some("cs_test_123"));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = completed_payload();
        let now = Utc::now();
        let signature = sign(&payload, now.timestamp());

        let mut tampered = payload.clone();
        tampered.extend_from_slice(b" ");
        let err = verify_and_parse(SECRET, &tampered, &signature, now).unwrap_err();
        assert!(matches!(err, HubError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = completed_payload();
        let now = Utc::now();
        let signature = sign(&payload, now.timestamp() - SIGNATURE_TOLERANCE_SECS - 1);

        assert!(verify_and_parse(SECRET, &payload, &signature, now).is_err());
    }

    #[test]
    fn test_other_events_carry_no_session() {
        let payload = serde_json::to_vec(&json!({
            "id": "evt_2",
            "type": "charge.refunded",
            "created": 1_700_000_000,
            "data": { "object": { "id": "ch_1" } }
        }))
        .unwrap();

        let event = parse_event(&payload).unwrap();
        assert_eq!(event.event_type, WebhookEventType::Other("charge.refunded".into()));
        assert!(event.session_id.is_none());
    }

    #[test]
    fn test_required_events_are_handled() {
        for event_type in REQUIRED_WEBHOOK_EVENTS {
            let payload = serde_json::to_vec(&json!({
                "id": "evt_3",
                "type": event_type,
                "created": 1_700_000_000,
                "data": { "object": { "id": "cs_test_456" } }
            }))
            .unwrap();

            let event = parse_event(&payload).unwrap();
            assert!(!matches!(event.event_type, WebhookEventType::Other(_)));
        }
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
