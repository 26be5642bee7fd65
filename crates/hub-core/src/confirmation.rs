//! # Payment Confirmation
//!
//! Applies the side effects of a completed checkout exactly once per
//! processor transaction.
//!
//! ```text
//!   retrieve session ──► payment for txn exists? ──yes──► AlreadyProcessed
//!                               │ no
//!                               ▼
//!                        session paid? ──no──► NotPaid
//!                               │ yes
//!                               ▼
//!                 insert payment (unique txn) ──duplicate──► AlreadyProcessed
//!                               │ inserted
//!                               ▼
//!                 participants_count += 1 ──► Recorded
//! ```
//!
//! Only the caller whose insert wins increments the contest, so repeated or
//! concurrent confirmations of one session (redirect refresh, webhook) count
//! the participant once.

use crate::checkout::{CheckoutSettings, PaymentStatus};
use crate::error::{HubError, HubResult};
use crate::id::RecordId;
use crate::payment::Payment;
use crate::processor::CheckoutProvider;
use crate::store::{InsertOutcome, Store, UpdateOutcome};
use chrono::Utc;
use tracing::{info, instrument, warn};

/// Result of confirming a checkout session
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    /// A payment for this transaction was already recorded; nothing changed
    AlreadyProcessed { transaction_id: String },
    /// Payment recorded and participant counted
    Recorded {
        transaction_id: String,
        payment: InsertOutcome,
        contest_update: UpdateOutcome,
    },
    /// Session not paid; nothing changed
    NotPaid { payment_status: PaymentStatus },
}

/// Confirm a checkout session against the processor and apply its effects.
#[instrument(skip(store, provider, settings))]
pub async fn confirm_checkout(
    store: &dyn Store,
    provider: &dyn CheckoutProvider,
    settings: &CheckoutSettings,
    session_id: &str,
) -> HubResult<Confirmation> {
    let session = provider.retrieve_session(session_id).await?;

    if let Some(transaction_id) = session.payment_intent_id.as_deref() {
        if store
            .find_payment_by_transaction(transaction_id)
            .await?
            .is_some()
        {
            info!("Payment {} already recorded", transaction_id);
            return Ok(Confirmation::AlreadyProcessed {
                transaction_id: transaction_id.to_string(),
            });
        }
    }

    if !session.is_paid() {
        info!(
            "Session {} not paid (status={})",
            session.session_id,
            session.payment_status.as_str()
        );
        return Ok(Confirmation::NotPaid {
            payment_status: session.payment_status,
        });
    }

    let transaction_id = session.payment_intent_id.clone().ok_or_else(|| HubError::ProviderError {
        provider: provider.provider_name().to_string(),
        message: format!("paid session {} has no payment intent", session.session_id),
    })?;
    let contest_id = session.contest_id()?;

    let payment = Payment {
        id: RecordId::new(),
        customer_email: session.customer_email.clone().unwrap_or_default(),
        contest_id,
        contest_name: session.contest_name().to_string(),
        amount: settings.to_major_units(session.amount_total),
        currency: session.currency.clone(),
        transaction_id: transaction_id.clone(),
        payment_status: session.payment_status.as_str().to_string(),
        paid_at: Utc::now(),
    };

    let inserted = match store.insert_payment(payment).await {
        Ok(outcome) => outcome,
        Err(HubError::Duplicate { .. }) => {
            info!("Payment {} recorded concurrently", transaction_id);
            return Ok(Confirmation::AlreadyProcessed { transaction_id });
        }
        Err(e) => return Err(e),
    };

    let contest_update = store.increment_participants(contest_id).await?;
    if contest_update.matched_count == 0 {
        warn!(
            "Payment {} recorded for missing contest {}",
            transaction_id, contest_id
        );
    }

    info!(
        "Recorded payment {} for contest {}",
        transaction_id, contest_id
    );

    Ok(Confirmation::Recorded {
        transaction_id,
        payment: inserted,
        contest_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{
        CheckoutRequest, CheckoutSession, SessionDetails, WebhookEvent, METADATA_CONTEST_ID,
        METADATA_CONTEST_NAME,
    };
    use crate::contest::{ContestStatus, NewContest};
    use crate::memory::MemoryStore;
    use crate::payment::PaymentFilter;
    use crate::store::{ContestStore, PaymentStore};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Provider that always reports the same session
    struct FixedSession(SessionDetails);

    #[async_trait]
    impl CheckoutProvider for FixedSession {
        async fn create_checkout(
            &self,
            _request: &CheckoutRequest,
            _settings: &CheckoutSettings,
        ) -> HubResult<CheckoutSession> {
            Err(HubError::Internal("not used".into()))
        }

        async fn retrieve_session(&self, _session_id: &str) -> HubResult<SessionDetails> {
            Ok(self.0.clone())
        }

        async fn verify_webhook(&self, _payload: &[u8], _signature: &str) -> HubResult<WebhookEvent> {
            Err(HubError::Internal("not used".into()))
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    async fn seeded_contest(store: &MemoryStore) -> RecordId {
        let contest = NewContest {
            name: "Logo Sprint".into(),
            image: None,
            description: String::new(),
            price: 10.0,
            prize: 100.0,
            instruction: String::new(),
            contest_type: "Image Design".into(),
            start_time: None,
            end_time: None,
            status: Some(ContestStatus::Confirmed),
            creator_email: "c@x.com".into(),
        }
        .into_contest(Utc::now());
        let id = contest.id;
        store.insert_contest(contest).await.unwrap();
        id
    }

    fn session(contest_id: RecordId, status: PaymentStatus, intent: Option<&str>) -> SessionDetails {
        let mut metadata = HashMap::new();
        metadata.insert(METADATA_CONTEST_ID.to_string(), contest_id.to_hex());
        metadata.insert(METADATA_CONTEST_NAME.to_string(), "Logo Sprint".to_string());
        SessionDetails {
            session_id: "cs_test_1".into(),
            payment_intent_id: intent.map(String::from),
            payment_status: status,
            amount_total: 1000,
            currency: "usd".into(),
            customer_email: Some("p@x.com".into()),
            metadata,
        }
    }

    #[tokio::test]
    async fn test_paid_session_recorded_once() {
        let store = MemoryStore::new();
        let contest_id = seeded_contest(&store).await;
        let provider = FixedSession(session(contest_id, PaymentStatus::Paid, Some("pi_1")));
        let settings = CheckoutSettings::default();

        let first = confirm_checkout(&store, &provider, &settings, "cs_test_1")
            .await
            .unwrap();
        assert!(matches!(first, Confirmation::Recorded { ref transaction_id, .. } if transaction_id == "pi_1"));

        for _ in 0..3 {
            let again = confirm_checkout(&store, &provider, &settings, "cs_test_1")
                .await
                .unwrap();
            assert_eq!(
                again,
                Confirmation::AlreadyProcessed {
                    transaction_id: "pi_1".into()
                }
            );
        }

        let contest = store.find_contest(contest_id).await.unwrap().unwrap();
        assert_eq!(contest.participants_count, 1);

        let payments = store.payments_for_customer("p@x.com").await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, 10.0);
        assert_eq!(payments[0].contest_id, contest_id);
        assert_eq!(payments[0].payment_status, "paid");
    }

    #[tokio::test]
    async fn test_unpaid_session_has_no_effects() {
        let store = MemoryStore::new();
        let contest_id = seeded_contest(&store).await;
        let provider = FixedSession(session(contest_id, PaymentStatus::Unpaid, None));

        let outcome = confirm_checkout(&store, &provider, &CheckoutSettings::default(), "cs_test_1")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Confirmation::NotPaid {
                payment_status: PaymentStatus::Unpaid
            }
        );

        let contest = store.find_contest(contest_id).await.unwrap().unwrap();
        assert_eq!(contest.participants_count, 0);
        assert!(store
            .find_payment(&PaymentFilter::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_paid_session_without_intent_fails() {
        let store = MemoryStore::new();
        let contest_id = seeded_contest(&store).await;
        let provider = FixedSession(session(contest_id, PaymentStatus::Paid, None));

        let err = confirm_checkout(&store, &provider, &CheckoutSettings::default(), "cs_test_1")
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::ProviderError { .. }));

        let contest = store.find_contest(contest_id).await.unwrap().unwrap();
        assert_eq!(contest.participants_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_count_once() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let contest_id = seeded_contest(&store).await;
        let provider = std::sync::Arc::new(FixedSession(session(
            contest_id,
            PaymentStatus::Paid,
            Some("pi_race"),
        )));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let provider = provider.clone();
            handles.push(tokio::spawn(async move {
                confirm_checkout(
                    store.as_ref(),
                    provider.as_ref(),
                    &CheckoutSettings::default(),
                    "cs_test_1",
                )
                .await
            }));
        }

        let mut recorded = 0;
        for handle in handles {
            if let Confirmation::Recorded { .. } = handle.await.unwrap().unwrap() {
                recorded += 1;
            }
        }

        assert_eq!(recorded, 1);
        let contest = store.find_contest(contest_id).await.unwrap().unwrap();
        assert_eq!(contest.participants_count, 1);
    }
}
