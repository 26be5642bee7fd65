//! # MongoDB Store
//!
//! `MongoStore` implements the `hub_core` store traits over four collections.
//! Uniqueness is enforced by indexes created in `ensure_indexes`; an insert
//! that trips one surfaces as `HubError::Duplicate`.

use crate::config::MongoConfig;
use crate::documents::{
    by_id, contest_edit_set, contest_filter, payment_filter, status_filter, ContestDocument,
    PaymentDocument, SubmissionDocument, UserDocument,
};
use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use hub_core::{
    Contest, ContestEdit, ContestFilter, ContestStatus, ContestStore, DeleteOutcome, HubError,
    HubResult, InsertOutcome, Payment, PaymentFilter, PaymentStore, RecordId, RolePatch,
    StatusPatch, Submission, SubmissionContentPatch, SubmissionStore, UpdateOutcome, User,
    UserStore, WinnerPatch,
};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

const DUPLICATE_KEY: i32 = 11000;

const USERS: &str = "users";
const CONTESTS: &str = "contests";
const SUBMISSIONS: &str = "submissions";
const PAYMENTS: &str = "payments";

/// MongoDB-backed store
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    users: Collection<UserDocument>,
    contests: Collection<ContestDocument>,
    submissions: Collection<SubmissionDocument>,
    payments: Collection<PaymentDocument>,
}

impl MongoStore {
    /// Connect, verify with a ping, and create the unique indexes.
    pub async fn connect(config: &MongoConfig) -> HubResult<Self> {
        let client = Client::with_uri_str(&config.uri).await.map_err(store_error)?;
        let db = client.database(&config.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(store_error)?;
        info!("Connected to MongoDB database {}", config.database);

        let store = Self::from_database(client, &db);
        store.ensure_indexes().await?;
        Ok(store)
    }

    fn from_database(client: Client, db: &Database) -> Self {
        Self {
            client,
            users: db.collection(USERS),
            contests: db.collection(CONTESTS),
            submissions: db.collection(SUBMISSIONS),
            payments: db.collection(PAYMENTS),
        }
    }

    /// Close the connection pool. Waits for outstanding cursors and sessions
    /// to be dropped, so call it after the server has stopped.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }

    /// Unique indexes backing the one-user-per-email, one-submission-per-
    /// participant-per-contest, and one-payment-per-transaction rules.
    pub async fn ensure_indexes(&self) -> HubResult<()> {
        self.users
            .create_index(unique_index(doc! { "email": 1 }))
            .await
            .map_err(store_error)?;
        self.submissions
            .create_index(unique_index(doc! { "contestId": 1, "participantEmail": 1 }))
            .await
            .map_err(store_error)?;
        self.payments
            .create_index(unique_index(doc! { "transectionId": 1 }))
            .await
            .map_err(store_error)?;
        info!("Unique indexes in place");
        Ok(())
    }
}

fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn store_error(err: MongoError) -> HubError {
    HubError::Store(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn insert_error(collection: &'static str, key: String) -> impl FnOnce(MongoError) -> HubError {
    move |err| {
        if is_duplicate_key(&err) {
            HubError::Duplicate { collection, key }
        } else {
            store_error(err)
        }
    }
}

fn update_outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome::new(result.matched_count, result.modified_count)
}

fn delete_outcome(result: DeleteResult) -> DeleteOutcome {
    DeleteOutcome::new(result.deleted_count)
}

async fn collect<D, T>(cursor: mongodb::Cursor<D>) -> HubResult<Vec<T>>
where
    D: DeserializeOwned + Unpin + Send + Sync,
    T: From<D>,
{
    let documents: Vec<D> = cursor.try_collect().await.map_err(store_error)?;
    Ok(documents.into_iter().map(T::from).collect())
}

#[async_trait]
impl UserStore for MongoStore {
    #[instrument(skip(self))]
    async fn list_users(&self) -> HubResult<Vec<User>> {
        let cursor = self.users.find(doc! {}).await.map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> HubResult<Option<User>> {
        let found = self
            .users
            .find_one(doc! { "email": email })
            .await
            .map_err(store_error)?;
        Ok(found.map(User::from))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: User) -> HubResult<InsertOutcome> {
        let id = user.id;
        let key = user.email.clone();
        self.users
            .insert_one(UserDocument::from(user))
            .await
            .map_err(insert_error(USERS, key))?;
        Ok(InsertOutcome::new(id))
    }

    #[instrument(skip(self))]
    async fn update_user_role(&self, id: RecordId, patch: RolePatch) -> HubResult<UpdateOutcome> {
        let result = self
            .users
            .update_one(
                by_id(id.object_id()),
                doc! { "$set": { "role": patch.role.as_str() } },
            )
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }
}

#[async_trait]
impl ContestStore for MongoStore {
    #[instrument(skip(self))]
    async fn list_contests(&self, filter: &ContestFilter) -> HubResult<Vec<Contest>> {
        let cursor = self
            .contests
            .find(contest_filter(filter))
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self))]
    async fn popular_contests(
        &self,
        status: Option<ContestStatus>,
        limit: usize,
    ) -> HubResult<Vec<Contest>> {
        let cursor = self
            .contests
            .find(status_filter(status))
            .sort(doc! { "participantsCount": -1 })
            .limit(limit as i64)
            .await
            .map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self))]
    async fn find_contest(&self, id: RecordId) -> HubResult<Option<Contest>> {
        let found = self
            .contests
            .find_one(by_id(id.object_id()))
            .await
            .map_err(store_error)?;
        Ok(found.map(Contest::from))
    }

    #[instrument(skip(self, contest), fields(name = %contest.name))]
    async fn insert_contest(&self, contest: Contest) -> HubResult<InsertOutcome> {
        let id = contest.id;
        self.contests
            .insert_one(ContestDocument::from(contest))
            .await
            .map_err(store_error)?;
        Ok(InsertOutcome::new(id))
    }

    #[instrument(skip(self, edit))]
    async fn edit_contest(&self, id: RecordId, edit: ContestEdit) -> HubResult<UpdateOutcome> {
        if edit.is_empty() {
            // An empty $set is rejected by older servers; report the match only.
            let matched = self
                .contests
                .count_documents(by_id(id.object_id()))
                .await
                .map_err(store_error)?;
            return Ok(UpdateOutcome::new(matched, 0));
        }

        let result = self
            .contests
            .update_one(
                by_id(id.object_id()),
                doc! { "$set": contest_edit_set(&edit) },
            )
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    #[instrument(skip(self))]
    async fn update_contest_status(
        &self,
        id: RecordId,
        patch: StatusPatch,
    ) -> HubResult<UpdateOutcome> {
        let result = self
            .contests
            .update_one(
                by_id(id.object_id()),
                doc! { "$set": { "status": patch.status.as_str() } },
            )
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    #[instrument(skip(self))]
    async fn increment_participants(&self, id: RecordId) -> HubResult<UpdateOutcome> {
        let result = self
            .contests
            .update_one(
                by_id(id.object_id()),
                doc! { "$inc": { "participantsCount": 1_i64 } },
            )
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    #[instrument(skip(self))]
    async fn delete_contest(&self, id: RecordId) -> HubResult<DeleteOutcome> {
        let result = self
            .contests
            .delete_one(by_id(id.object_id()))
            .await
            .map_err(store_error)?;
        Ok(delete_outcome(result))
    }
}

#[async_trait]
impl SubmissionStore for MongoStore {
    #[instrument(skip(self))]
    async fn winning_submissions(&self, limit: usize) -> HubResult<Vec<Submission>> {
        let cursor = self
            .submissions
            .find(doc! { "isWinner": true })
            .sort(doc! { "createdAt": -1 })
            .limit(limit as i64)
            .await
            .map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self))]
    async fn submissions_for_contest(&self, contest_id: RecordId) -> HubResult<Vec<Submission>> {
        let cursor = self
            .submissions
            .find(doc! { "contestId": contest_id.object_id() })
            .await
            .map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self))]
    async fn submissions_for_participant(&self, email: &str) -> HubResult<Vec<Submission>> {
        let cursor = self
            .submissions
            .find(doc! { "participantEmail": email })
            .await
            .map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self, submission), fields(contest_id = %submission.contest_id))]
    async fn insert_submission(&self, submission: Submission) -> HubResult<InsertOutcome> {
        let id = submission.id;
        let key = format!("{}/{}", submission.contest_id, submission.participant_email);
        self.submissions
            .insert_one(SubmissionDocument::from(submission))
            .await
            .map_err(insert_error(SUBMISSIONS, key))?;
        Ok(InsertOutcome::new(id))
    }

    #[instrument(skip(self))]
    async fn set_winner(&self, id: RecordId, patch: WinnerPatch) -> HubResult<UpdateOutcome> {
        let result = self
            .submissions
            .update_one(
                by_id(id.object_id()),
                doc! { "$set": { "isWinner": patch.is_winner } },
            )
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    #[instrument(skip(self, patch))]
    async fn update_submission_content(
        &self,
        id: RecordId,
        patch: SubmissionContentPatch,
    ) -> HubResult<UpdateOutcome> {
        let result = self
            .submissions
            .update_one(
                by_id(id.object_id()),
                doc! { "$set": { "submissionData": patch.submission_data } },
            )
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    #[instrument(skip(self))]
    async fn delete_submission(&self, id: RecordId) -> HubResult<DeleteOutcome> {
        let result = self
            .submissions
            .delete_one(by_id(id.object_id()))
            .await
            .map_err(store_error)?;
        Ok(delete_outcome(result))
    }
}

#[async_trait]
impl PaymentStore for MongoStore {
    #[instrument(skip(self))]
    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> HubResult<Option<Payment>> {
        let found = self
            .payments
            .find_one(doc! { "transectionId": transaction_id })
            .await
            .map_err(store_error)?;
        Ok(found.map(Payment::from))
    }

    #[instrument(skip(self))]
    async fn payments_for_customer(&self, email: &str) -> HubResult<Vec<Payment>> {
        let cursor = self
            .payments
            .find(doc! { "customerEmail": email })
            .sort(doc! { "paidAt": -1 })
            .await
            .map_err(store_error)?;
        collect(cursor).await
    }

    #[instrument(skip(self))]
    async fn find_payment(&self, filter: &PaymentFilter) -> HubResult<Option<Payment>> {
        let found = self
            .payments
            .find_one(payment_filter(filter))
            .await
            .map_err(store_error)?;
        Ok(found.map(Payment::from))
    }

    #[instrument(skip(self, payment), fields(transaction_id = %payment.transaction_id))]
    async fn insert_payment(&self, payment: Payment) -> HubResult<InsertOutcome> {
        let id = payment.id;
        let key = payment.transaction_id.clone();
        self.payments
            .insert_one(PaymentDocument::from(payment))
            .await
            .map_err(insert_error(PAYMENTS, key))?;
        Ok(InsertOutcome::new(id))
    }
}
