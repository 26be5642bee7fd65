//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API for contest entry fees:
//! one line item per session, created in `payment` mode, later retrieved to
//! learn whether it was paid.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_core::{
    CheckoutProvider, CheckoutRequest, CheckoutSession, CheckoutSettings, HubError, HubResult,
    PaymentStatus, SessionDetails, WebhookEvent, METADATA_CONTEST_ID, METADATA_CONTEST_NAME,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session provider
///
/// Uses Stripe's hosted checkout page; card data never touches this service.
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new Stripe checkout provider
    pub fn new(config: StripeConfig) -> HubResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| HubError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> HubResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form body for `POST /v1/checkout/sessions`
    fn build_form(
        request: &CheckoutRequest,
        settings: &CheckoutSettings,
    ) -> HubResult<Vec<(String, String)>> {
        let unit_amount = settings.to_minor_units(request.price)?;

        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), settings.success_url()),
            ("cancel_url".to_string(), settings.cancel_url()),
            (
                "line_items[0][price_data][currency]".to_string(),
                settings.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.contest_name.clone(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                format!("metadata[{}]", METADATA_CONTEST_ID),
                request.contest_id.to_hex(),
            ),
            (
                format!("metadata[{}]", METADATA_CONTEST_NAME),
                request.contest_name.clone(),
            ),
        ];

        if let Some(email) = &request.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }

        Ok(form)
    }

    async fn read_response(response: reqwest::Response) -> HubResult<(StatusCode, String)> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HubError::NetworkError(e.to_string()))?;
        Ok((status, body))
    }
}

/// Map a non-2xx Stripe response to a provider error
fn provider_error(status: StatusCode, body: &str) -> HubError {
    error!("Stripe API error: status={}, body={}", status, body);

    let message = match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => format!("HTTP {}: {}", status, body),
    };

    HubError::ProviderError {
        provider: PROVIDER.to_string(),
        message,
    }
}

fn valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    #[instrument(skip(self, request, settings), fields(contest_id = %request.contest_id))]
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
        settings: &CheckoutSettings,
    ) -> HubResult<CheckoutSession> {
        let form = Self::build_form(request, settings)?;

        debug!("Creating Stripe checkout session for {}", request.contest_name);

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await
            .map_err(|e| HubError::NetworkError(e.to_string()))?;

        let (status, body) = Self::read_response(response).await?;
        if !status.is_success() {
            return Err(provider_error(status, &body));
        }

        let created: StripeCreatedSession = serde_json::from_str(&body).map_err(|e| {
            HubError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let checkout_url = created.url.ok_or_else(|| HubError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("session {} returned without a url", created.id),
        })?;

        info!("Created Stripe checkout session: id={}", created.id);

        Ok(CheckoutSession {
            session_id: created.id,
            checkout_url,
            expires_at: created
                .expires_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }

    #[instrument(skip(self))]
    async fn retrieve_session(&self, session_id: &str) -> HubResult<SessionDetails> {
        if !valid_session_id(session_id) {
            return Err(HubError::InvalidRequest(format!(
                "malformed checkout session id: {:?}",
                session_id
            )));
        }

        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, session_id
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| HubError::NetworkError(e.to_string()))?;

        let (status, body) = Self::read_response(response).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(HubError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(provider_error(status, &body));
        }

        let session: StripeSession = serde_json::from_str(&body).map_err(|e| {
            HubError::Serialization(format!("Failed to parse Stripe session: {}", e))
        })?;

        debug!(
            "Retrieved Stripe session {}: payment_status={}",
            session.id,
            session.payment_status.as_str()
        );

        let customer_email = session
            .customer_email
            .or_else(|| session.customer_details.and_then(|d| d.email));

        Ok(SessionDetails {
            session_id: session.id,
            payment_intent_id: session.payment_intent,
            payment_status: session.payment_status,
            amount_total: session.amount_total.unwrap_or(0),
            currency: session.currency.unwrap_or_default(),
            customer_email,
            metadata: session.metadata,
        })
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> HubResult<WebhookEvent> {
        let secret = self.config.webhook_secret.as_deref().ok_or_else(|| {
            HubError::Configuration("STRIPE_WEBHOOK_SECRET not set".to_string())
        })?;
        webhook::verify_and_parse(secret, payload, signature, Utc::now())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCreatedSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    #[serde(default)]
    payment_intent: Option<String>,
    payment_status: PaymentStatus,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    customer_email: Option<String>,
    #[serde(default)]
    customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
