//! # Document Store Traits
//!
//! The persistence seam. Handlers only see these traits; the MongoDB backend
//! (`hub-mongo`) and the in-memory backend (`MemoryStore`) implement them.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │       Store = UserStore + ContestStore + SubmissionStore     │
//! │               + PaymentStore (blanket impl)                  │
//! └──────────────────────────────────────────────────────────────┘
//!                  ▲                          ▲
//!          ┌───────┴───────┐          ┌───────┴───────┐
//!          │  MongoStore   │          │  MemoryStore  │
//!          └───────────────┘          └───────────────┘
//! ```
//!
//! Inserts that carry a uniqueness rule (user email, submission pair, payment
//! transaction id) are atomic: a conflicting insert fails with
//! `HubError::Duplicate` instead of writing a second record.

use crate::contest::{Contest, ContestEdit, ContestFilter, ContestStatus, StatusPatch};
use crate::error::HubResult;
use crate::id::RecordId;
use crate::payment::{Payment, PaymentFilter};
use crate::submission::{Submission, SubmissionContentPatch, WinnerPatch};
use crate::user::{RolePatch, User};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Cap for the popular-contests leaderboard
pub const POPULAR_CONTESTS_LIMIT: usize = 6;

/// Cap for the public winners feed
pub const WINNER_FEED_LIMIT: usize = 6;

/// Acknowledgement of a single-document insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: RecordId,
}

impl InsertOutcome {
    pub fn new(inserted_id: RecordId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Acknowledgement of a single-document update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }

    pub fn unmatched() -> Self {
        Self::new(0, 0)
    }
}

/// Acknowledgement of a single-document delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> HubResult<Vec<User>>;

    async fn find_user_by_email(&self, email: &str) -> HubResult<Option<User>>;

    /// Fails with `Duplicate` when the email is already registered.
    async fn insert_user(&self, user: User) -> HubResult<InsertOutcome>;

    async fn update_user_role(&self, id: RecordId, patch: RolePatch) -> HubResult<UpdateOutcome>;
}

#[async_trait]
pub trait ContestStore: Send + Sync {
    /// Newest first.
    async fn list_contests(&self, filter: &ContestFilter) -> HubResult<Vec<Contest>>;

    /// Highest `participants_count` first, at most `limit` records.
    async fn popular_contests(
        &self,
        status: Option<ContestStatus>,
        limit: usize,
    ) -> HubResult<Vec<Contest>>;

    async fn find_contest(&self, id: RecordId) -> HubResult<Option<Contest>>;

    async fn insert_contest(&self, contest: Contest) -> HubResult<InsertOutcome>;

    async fn edit_contest(&self, id: RecordId, edit: ContestEdit) -> HubResult<UpdateOutcome>;

    async fn update_contest_status(
        &self,
        id: RecordId,
        patch: StatusPatch,
    ) -> HubResult<UpdateOutcome>;

    /// Atomic `participants_count += 1`.
    async fn increment_participants(&self, id: RecordId) -> HubResult<UpdateOutcome>;

    async fn delete_contest(&self, id: RecordId) -> HubResult<DeleteOutcome>;
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Winners only, newest first, at most `limit` records.
    async fn winning_submissions(&self, limit: usize) -> HubResult<Vec<Submission>>;

    async fn submissions_for_contest(&self, contest_id: RecordId) -> HubResult<Vec<Submission>>;

    async fn submissions_for_participant(&self, email: &str) -> HubResult<Vec<Submission>>;

    /// Fails with `Duplicate` when the participant already entered the contest.
    async fn insert_submission(&self, submission: Submission) -> HubResult<InsertOutcome>;

    async fn set_winner(&self, id: RecordId, patch: WinnerPatch) -> HubResult<UpdateOutcome>;

    async fn update_submission_content(
        &self,
        id: RecordId,
        patch: SubmissionContentPatch,
    ) -> HubResult<UpdateOutcome>;

    async fn delete_submission(&self, id: RecordId) -> HubResult<DeleteOutcome>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_payment_by_transaction(&self, transaction_id: &str)
        -> HubResult<Option<Payment>>;

    /// Newest first.
    async fn payments_for_customer(&self, email: &str) -> HubResult<Vec<Payment>>;

    /// First payment matching the filter, if any.
    async fn find_payment(&self, filter: &PaymentFilter) -> HubResult<Option<Payment>>;

    /// Fails with `Duplicate` when the transaction id was already recorded.
    async fn insert_payment(&self, payment: Payment) -> HubResult<InsertOutcome>;
}

/// Every collection the service touches
pub trait Store: UserStore + ContestStore + SubmissionStore + PaymentStore {}

impl<T> Store for T where T: UserStore + ContestStore + SubmissionStore + PaymentStore {}

/// Shared store handle (dynamic dispatch)
pub type SharedStore = Arc<dyn Store>;
