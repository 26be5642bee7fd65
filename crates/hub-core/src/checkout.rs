//! # Checkout Types
//!
//! Request, session, and webhook types for the hosted-checkout entry-fee flow,
//! plus `CheckoutSettings`, which names the redirect base URL, the currency,
//! and the major→minor unit conversion used when talking to the processor.

use crate::error::{HubError, HubResult};
use crate::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying the contest id on a checkout session
pub const METADATA_CONTEST_ID: &str = "contestId";

/// Metadata key carrying the contest name on a checkout session
pub const METADATA_CONTEST_NAME: &str = "contestName";

/// Checkout configuration
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Client site that the processor redirects back to (e.g. "https://contesthub.app")
    pub site_domain: String,
    /// ISO 4217 code, lowercase as the processor expects
    pub currency: String,
    /// Minor units per major unit (100 cents per dollar)
    pub minor_units_per_major: i64,
}

impl CheckoutSettings {
    pub fn new(site_domain: impl Into<String>) -> Self {
        Self {
            site_domain: site_domain.into().trim_end_matches('/').to_string(),
            currency: "usd".to_string(),
            minor_units_per_major: 100,
        }
    }

    /// Convert a major-unit price to processor minor units
    pub fn to_minor_units(&self, price: f64) -> HubResult<i64> {
        if !price.is_finite() || price < 0.0 {
            return Err(HubError::InvalidPrice {
                message: format!("price must be a non-negative number, got {price}"),
            });
        }
        Ok((price * self.minor_units_per_major as f64).round() as i64)
    }

    /// Convert processor minor units back to a major-unit amount
    pub fn to_major_units(&self, amount: i64) -> f64 {
        amount as f64 / self.minor_units_per_major as f64
    }

    /// Success redirect; the processor substitutes the session id placeholder
    pub fn success_url(&self) -> String {
        format!(
            "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
            self.site_domain
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/payment-cancelled", self.site_domain)
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self::new("http://localhost:5173")
    }
}

/// Body of `POST /create-checkout-session`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Entry fee in major units
    pub price: f64,
    pub contest_id: RecordId,
    pub contest_name: String,
    /// Prefills the hosted page
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// A session created at the processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,

    /// URL to redirect the payer to
    pub checkout_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Processor-reported payment status of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::NoPaymentRequired => "no_payment_required",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

/// A session as retrieved from the processor's source of truth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
    pub session_id: String,

    /// Payment-intent id; the idempotency key for recording a payment
    pub payment_intent_id: Option<String>,

    pub payment_status: PaymentStatus,

    /// Amount charged, in minor units
    pub amount_total: i64,

    pub currency: String,

    pub customer_email: Option<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SessionDetails {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Contest the fee was paid for
    pub fn contest_id(&self) -> HubResult<RecordId> {
        let raw = self.metadata.get(METADATA_CONTEST_ID).ok_or_else(|| {
            HubError::InvalidRequest(format!(
                "checkout session {} has no {} metadata",
                self.session_id, METADATA_CONTEST_ID
            ))
        })?;
        RecordId::parse(raw)
    }

    pub fn contest_name(&self) -> &str {
        self.metadata
            .get(METADATA_CONTEST_NAME)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Webhook event types we act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Checkout session completed
    CheckoutCompleted,
    /// Anything else (acknowledged, ignored)
    Other(String),
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_id: String,

    pub event_type: WebhookEventType,

    /// Related session id (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_unit_conversion() {
        let settings = CheckoutSettings::default();
        assert_eq!(settings.to_minor_units(10.0).unwrap(), 1000);
        assert_eq!(settings.to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(settings.to_major_units(1999), 19.99);
    }

    #[test]
    fn test_invalid_price() {
        let settings = CheckoutSettings::default();
        assert!(settings.to_minor_units(-1.0).is_err());
        assert!(settings.to_minor_units(f64::NAN).is_err());
    }

    #[test]
    fn test_redirect_urls() {
        let settings = CheckoutSettings::new("https://contesthub.app/");
        assert_eq!(
            settings.success_url(),
            "https://contesthub.app/payment-success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(settings.cancel_url(), "https://contesthub.app/payment-cancelled");
    }

    #[test]
    fn test_session_metadata() {
        let contest = RecordId::new();
        let mut metadata = HashMap::new();
        metadata.insert(METADATA_CONTEST_ID.to_string(), contest.to_hex());
        metadata.insert(METADATA_CONTEST_NAME.to_string(), "Logo Sprint".to_string());

        let session = SessionDetails {
            session_id: "cs_test_1".into(),
            payment_intent_id: Some("pi_1".into()),
            payment_status: PaymentStatus::Paid,
            amount_total: 1000,
            currency: "usd".into(),
            customer_email: None,
            metadata,
        };

        assert!(session.is_paid());
        assert_eq!(session.contest_id().unwrap(), contest);
        assert_eq!(session.contest_name(), "Logo Sprint");
    }

    #[test]
    fn test_missing_contest_metadata() {
        let session = SessionDetails {
            session_id: "cs_test_2".into(),
            payment_intent_id: None,
            payment_status: PaymentStatus::Unpaid,
            amount_total: 0,
            currency: "usd".into(),
            customer_email: None,
            metadata: HashMap::new(),
        };
        assert!(session.contest_id().is_err());
        assert_eq!(session.contest_name(), "");
    }

    #[test]
    fn test_payment_status_parse() {
        let status: PaymentStatus = serde_json::from_str(r#""no_payment_required""#).unwrap();
        assert_eq!(status, PaymentStatus::NoPaymentRequired);
        let status: PaymentStatus = serde_json::from_str(r#""something_new""#).unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }
}
