//! # Stored Document Shapes
//!
//! BSON layouts of the four collections. Identifiers are native ObjectIds and
//! timestamps are BSON dates; the core records carry `RecordId` and chrono
//! times, so each document converts both ways.

use bson::oid::ObjectId;
use bson::{doc, DateTime as BsonDateTime, Document};
use hub_core::{
    Contest, ContestEdit, ContestFilter, ContestStatus, Payment, PaymentFilter, Role, Submission,
    User,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: BsonDateTime,
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        Self {
            id: user.id.object_id(),
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role,
            created_at: BsonDateTime::from_chrono(user.created_at),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.into(),
            name: doc.name,
            email: doc.email,
            photo_url: doc.photo_url,
            role: doc.role,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub prize: f64,
    #[serde(default)]
    pub instruction: String,
    #[serde(rename = "type", default)]
    pub contest_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<BsonDateTime>,
    #[serde(default)]
    pub status: ContestStatus,
    #[serde(default)]
    pub participants_count: i64,
    #[serde(default)]
    pub creator_email: String,
    pub created_at: BsonDateTime,
}

impl From<Contest> for ContestDocument {
    fn from(contest: Contest) -> Self {
        Self {
            id: contest.id.object_id(),
            name: contest.name,
            image: contest.image,
            description: contest.description,
            price: contest.price,
            prize: contest.prize,
            instruction: contest.instruction,
            contest_type: contest.contest_type,
            start_time: contest.start_time.map(BsonDateTime::from_chrono),
            end_time: contest.end_time.map(BsonDateTime::from_chrono),
            status: contest.status,
            participants_count: contest.participants_count,
            creator_email: contest.creator_email,
            created_at: BsonDateTime::from_chrono(contest.created_at),
        }
    }
}

impl From<ContestDocument> for Contest {
    fn from(doc: ContestDocument) -> Self {
        Self {
            id: doc.id.into(),
            name: doc.name,
            image: doc.image,
            description: doc.description,
            price: doc.price,
            prize: doc.prize,
            instruction: doc.instruction,
            contest_type: doc.contest_type,
            start_time: doc.start_time.map(|t| t.to_chrono()),
            end_time: doc.end_time.map(|t| t.to_chrono()),
            status: doc.status,
            participants_count: doc.participants_count,
            creator_email: doc.creator_email,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub contest_id: ObjectId,
    pub participant_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_name: Option<String>,
    #[serde(default)]
    pub submission_data: String,
    #[serde(default)]
    pub is_winner: bool,
    pub created_at: BsonDateTime,
}

impl From<Submission> for SubmissionDocument {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id.object_id(),
            contest_id: submission.contest_id.object_id(),
            participant_email: submission.participant_email,
            participant_name: submission.participant_name,
            submission_data: submission.submission_data,
            is_winner: submission.is_winner,
            created_at: BsonDateTime::from_chrono(submission.created_at),
        }
    }
}

impl From<SubmissionDocument> for Submission {
    fn from(doc: SubmissionDocument) -> Self {
        Self {
            id: doc.id.into(),
            contest_id: doc.contest_id.into(),
            participant_email: doc.participant_email,
            participant_name: doc.participant_name,
            submission_data: doc.submission_data,
            is_winner: doc.is_winner,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub customer_email: String,
    pub contest_id: ObjectId,
    pub contest_name: String,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "transectionId")]
    pub transaction_id: String,
    pub payment_status: String,
    pub paid_at: BsonDateTime,
}

impl From<Payment> for PaymentDocument {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.object_id(),
            customer_email: payment.customer_email,
            contest_id: payment.contest_id.object_id(),
            contest_name: payment.contest_name,
            amount: payment.amount,
            currency: payment.currency,
            transaction_id: payment.transaction_id,
            payment_status: payment.payment_status,
            paid_at: BsonDateTime::from_chrono(payment.paid_at),
        }
    }
}

impl From<PaymentDocument> for Payment {
    fn from(doc: PaymentDocument) -> Self {
        Self {
            id: doc.id.into(),
            customer_email: doc.customer_email,
            contest_id: doc.contest_id.into(),
            contest_name: doc.contest_name,
            amount: doc.amount,
            currency: doc.currency,
            transaction_id: doc.transaction_id,
            payment_status: doc.payment_status,
            paid_at: doc.paid_at.to_chrono(),
        }
    }
}

// =============================================================================
// Query builders
// =============================================================================

pub fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

pub fn contest_filter(filter: &ContestFilter) -> Document {
    let mut query = Document::new();
    if let Some(status) = &filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(email) = &filter.creator_email {
        query.insert("creatorEmail", email.as_str());
    }
    query
}

pub fn status_filter(status: Option<ContestStatus>) -> Document {
    contest_filter(&ContestFilter {
        status,
        creator_email: None,
    })
}

pub fn payment_filter(filter: &PaymentFilter) -> Document {
    let mut query = Document::new();
    if let Some(email) = &filter.customer_email {
        query.insert("customerEmail", email.as_str());
    }
    if let Some(contest_id) = filter.contest_id {
        query.insert("contestId", contest_id.object_id());
    }
    query
}

/// `$set` body for a creator edit; only whitelisted fields can appear.
pub fn contest_edit_set(edit: &ContestEdit) -> Document {
    let mut set = Document::new();
    if let Some(name) = &edit.name {
        set.insert("name", name.as_str());
    }
    if let Some(image) = &edit.image {
        set.insert("image", image.as_str());
    }
    if let Some(description) = &edit.description {
        set.insert("description", description.as_str());
    }
    if let Some(price) = edit.price {
        set.insert("price", price);
    }
    if let Some(prize) = edit.prize {
        set.insert("prize", prize);
    }
    if let Some(instruction) = &edit.instruction {
        set.insert("instruction", instruction.as_str());
    }
    if let Some(contest_type) = &edit.contest_type {
        set.insert("type", contest_type.as_str());
    }
    if let Some(start) = edit.start_time {
        set.insert("startTime", BsonDateTime::from_chrono(start));
    }
    if let Some(end) = edit.end_time {
        set.insert("endTime", BsonDateTime::from_chrono(end));
    }
    set
}
