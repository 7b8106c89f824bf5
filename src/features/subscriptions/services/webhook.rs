//! Stripe webhook signature verification and event payload parsing.
//!
//! The `Stripe-Signature` header carries `t=<unix>,v1=<hex hmac>[,v1=...]`;
//! the signed payload is `"{t}.{raw body}"` under HMAC-SHA256 with the
//! endpoint secret.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::core::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Accept events up to five minutes old, Stripe's documented default.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parse `t=...,v1=...` pairs. Unknown schemes (v0) are ignored.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for pair in header.split(',') {
        let mut parts = pair.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("t"), Some(value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            (Some("v1"), Some(value)) => {
                signatures.push(value.to_string());
            }
            _ => {}
        }
    }

    match (timestamp, signatures.is_empty()) {
        (Some(timestamp), false) => Ok(SignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(AppError::BadRequest(
            "Malformed Stripe-Signature header".to_string(),
        )),
    }
}

pub fn expected_signature(secret: &str, timestamp: i64, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a webhook body against its signature header at time `now`.
pub fn verify_signature(secret: &str, header: &str, body: &[u8], now: i64) -> Result<()> {
    let parsed = parse_signature_header(header)?;

    if (now - parsed.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(AppError::BadRequest(
            "Stripe-Signature timestamp outside tolerance".to_string(),
        ));
    }

    let expected = expected_signature(secret, parsed.timestamp, body)?;
    if parsed.signatures.iter().any(|sig| sig == &expected) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Stripe-Signature verification failed".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

/// `checkout.session.completed` payload, reduced to the fields consumed here.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    #[serde(default)]
    pub id: String,
    /// Stripe subscription id; a string unless the caller expanded it
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// `customer.subscription.*` payload.
#[derive(Debug, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub status: String,
}

pub fn parse_event(body: &[u8]) -> Result<WebhookEvent> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed Stripe event: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const BODY: &[u8] = br#"{"type":"checkout.session.completed","data":{"object":{}}}"#;

    fn signed_header(timestamp: i64) -> String {
        format!(
            "t={},v1={}",
            timestamp,
            expected_signature(SECRET, timestamp, BODY).unwrap()
        )
    }

    #[test]
    fn valid_signature_passes() {
        let now = 1_700_000_000;
        assert!(verify_signature(SECRET, &signed_header(now), BODY, now).is_ok());
    }

    #[test]
    fn signature_within_tolerance_passes() {
        let now = 1_700_000_000;
        let header = signed_header(now - SIGNATURE_TOLERANCE_SECS);
        assert!(verify_signature(SECRET, &header, BODY, now).is_ok());
    }

    #[test]
    fn expired_timestamp_is_rejected() {
        let now = 1_700_000_000;
        let header = signed_header(now - SIGNATURE_TOLERANCE_SECS - 1);
        assert!(verify_signature(SECRET, &header, BODY, now).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = 1_700_000_000;
        let header = format!(
            "t={},v1={}",
            now,
            expected_signature("whsec_other", now, BODY).unwrap()
        );
        assert!(verify_signature(SECRET, &header, BODY, now).is_err());
    }

    #[test]
    fn tampered_body_is_rejected() {
        let now = 1_700_000_000;
        let header = signed_header(now);
        assert!(verify_signature(SECRET, &header, b"{\"tampered\":true}", now).is_err());
    }

    #[test]
    fn header_with_multiple_v1_entries_matches_any() {
        let now = 1_700_000_000;
        let header = format!(
            "t={},v1=deadbeef,v1={}",
            now,
            expected_signature(SECRET, now, BODY).unwrap()
        );
        assert!(verify_signature(SECRET, &header, BODY, now).is_ok());
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert!(parse_signature_header("").is_err());
        assert!(parse_signature_header("t=abc,v1=def").is_err());
        assert!(parse_signature_header("v1=deadbeef").is_err());
        assert!(parse_signature_header("t=123").is_err());
    }

    #[test]
    fn parses_checkout_session_event() {
        let body = br#"{
            "type": "checkout.session.completed",
            "data": {"object": {
                "id": "cs_123",
                "subscription": "sub_456",
                "metadata": {"creator_id": "7", "subscriber_id": "12"}
            }}
        }"#;
        let event = parse_event(body).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");

        let session: CheckoutSessionObject = serde_json::from_value(event.data.object).unwrap();
        assert_eq!(session.id, "cs_123");
        assert_eq!(session.subscription.as_deref(), Some("sub_456"));
        assert_eq!(session.metadata.get("creator_id").map(String::as_str), Some("7"));
    }

    #[test]
    fn garbage_body_fails_parse() {
        assert!(parse_event(b"not json").is_err());
    }
}
