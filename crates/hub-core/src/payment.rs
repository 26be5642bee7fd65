//! # Payment Records
//!
//! A `Payment` is written once per processor transaction and never mutated.

use crate::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed entry-fee payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: RecordId,

    pub customer_email: String,

    pub contest_id: RecordId,

    pub contest_name: String,

    /// Amount in major currency units
    pub amount: f64,

    pub currency: String,

    /// Processor payment-intent id; unique across payments
    #[serde(rename = "transectionId")]
    pub transaction_id: String,

    pub payment_status: String,

    pub paid_at: DateTime<Utc>,
}

/// Lookup filter for `GET /payments`; absent fields match anything
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub contest_id: Option<RecordId>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        self.customer_email
            .as_deref()
            .map_or(true, |email| payment.customer_email == email)
            && self.contest_id.map_or(true, |id| payment.contest_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(email: &str, contest_id: RecordId) -> Payment {
        Payment {
            id: RecordId::new(),
            customer_email: email.into(),
            contest_id,
            contest_name: "Logo Sprint".into(),
            amount: 10.0,
            currency: "usd".into(),
            transaction_id: "pi_123".into(),
            payment_status: "paid".into(),
            paid_at: Utc::now(),
        }
    }

    #[test]
    fn test_transaction_id_wire_name() {
        let json = serde_json::to_value(sample("p@x.com", RecordId::new())).unwrap();
        assert_eq!(json["transectionId"], "pi_123");
        assert_eq!(json["customerEmail"], "p@x.com");
        assert!(json.get("paidAt").is_some());
    }

    #[test]
    fn test_filter_matching() {
        let contest = RecordId::new();
        let payment = sample("p@x.com", contest);

        assert!(PaymentFilter::default().matches(&payment));
        assert!(PaymentFilter {
            customer_email: Some("p@x.com".into()),
            contest_id: Some(contest),
        }
        .matches(&payment));
        assert!(!PaymentFilter {
            customer_email: None,
            contest_id: Some(RecordId::new()),
        }
        .matches(&payment));
    }
}
