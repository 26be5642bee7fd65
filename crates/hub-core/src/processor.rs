//! # Payment Processor Trait
//!
//! The seam between the service and the hosted-checkout provider.
//! `hub-stripe` provides the production implementation; tests script their own.

use crate::checkout::{CheckoutRequest, CheckoutSession, CheckoutSettings, SessionDetails, WebhookEvent};
use crate::error::HubResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Hosted-checkout provider
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a hosted checkout session for one contest entry fee.
    ///
    /// # Arguments
    /// * `request` - Price and contest identity
    /// * `settings` - Currency, unit conversion, and redirect URLs
    ///
    /// # Returns
    /// A `CheckoutSession` containing the redirect URL.
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
        settings: &CheckoutSettings,
    ) -> HubResult<CheckoutSession>;

    /// Retrieve a session's current state from the provider.
    async fn retrieve_session(&self, session_id: &str) -> HubResult<SessionDetails>;

    /// Verify a webhook signature and parse the event.
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> HubResult<WebhookEvent>;

    /// Get the provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;
}

/// Shared provider handle (dynamic dispatch)
pub type SharedProvider = Arc<dyn CheckoutProvider>;
