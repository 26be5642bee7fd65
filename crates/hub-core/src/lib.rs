//! # hub-core
//!
//! Core types and traits for the contest-hub backend.
//!
//! This crate provides:
//! - `User`, `Contest`, `Submission`, and `Payment` records, each with the
//!   patch types that bound what an update may touch
//! - `Store` traits for the document store, plus the in-memory `MemoryStore`
//! - `CheckoutProvider` trait for the hosted-checkout payment processor
//! - `confirm_checkout`, the exactly-once payment confirmation flow
//! - `HubError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use hub_core::{confirm_checkout, CheckoutSettings, Confirmation};
//!
//! let settings = CheckoutSettings::new("https://contesthub.app");
//!
//! // Later, when the payer is redirected back with ?session_id=...
//! match confirm_checkout(store.as_ref(), provider.as_ref(), &settings, &session_id).await? {
//!     Confirmation::Recorded { transaction_id, .. } => println!("paid: {transaction_id}"),
//!     Confirmation::AlreadyProcessed { .. } | Confirmation::NotPaid { .. } => {}
//! }
//! ```

pub mod checkout;
pub mod confirmation;
pub mod contest;
pub mod error;
pub mod id;
pub mod memory;
pub mod payment;
pub mod processor;
pub mod store;
pub mod submission;
pub mod user;

// Re-exports for convenience
pub use checkout::{
    CheckoutRequest, CheckoutSession, CheckoutSettings, PaymentStatus, SessionDetails,
    WebhookEvent, WebhookEventType, METADATA_CONTEST_ID, METADATA_CONTEST_NAME,
};
pub use confirmation::{confirm_checkout, Confirmation};
pub use contest::{Contest, ContestEdit, ContestFilter, ContestStatus, NewContest, StatusPatch};
pub use error::{HubError, HubResult};
pub use id::RecordId;
pub use memory::MemoryStore;
pub use payment::{Payment, PaymentFilter};
pub use processor::{CheckoutProvider, SharedProvider};
pub use store::{
    ContestStore, DeleteOutcome, InsertOutcome, PaymentStore, SharedStore, Store,
    SubmissionStore, UpdateOutcome, UserStore, POPULAR_CONTESTS_LIMIT, WINNER_FEED_LIMIT,
};
pub use submission::{NewSubmission, Submission, SubmissionContentPatch, WinnerPatch};
pub use user::{NewUser, Role, RolePatch, User};
