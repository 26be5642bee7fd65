//! # hub-stripe
//!
//! Stripe Checkout client for the contest-hub backend.
//!
//! `StripeCheckoutProvider` implements `hub_core::CheckoutProvider`:
//! - creates a one-item hosted Checkout Session per contest entry fee
//! - retrieves sessions so confirmation is derived from Stripe's record,
//!   never from the payer's redirect alone
//! - verifies `Stripe-Signature` on webhook deliveries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hub_stripe::StripeCheckoutProvider;
//! use hub_core::{CheckoutProvider, CheckoutSettings};
//!
//! let provider = StripeCheckoutProvider::from_env()?;
//! let session = provider
//!     .create_checkout(&request, &CheckoutSettings::new("https://contesthub.app"))
//!     .await?;
//!
//! // Redirect the payer to session.checkout_url
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckoutProvider;
pub use config::StripeConfig;
pub use webhook::{compute_hmac_sha256, verify_and_parse, REQUIRED_WEBHOOK_EVENTS};
