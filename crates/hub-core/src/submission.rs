//! # Submission Types

use crate::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A participant's entry. Unique per (contest_id, participant_email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "_id")]
    pub id: RecordId,

    pub contest_id: RecordId,

    pub participant_email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_name: Option<String>,

    #[serde(default)]
    pub submission_data: String,

    #[serde(default)]
    pub is_winner: bool,

    pub created_at: DateTime<Utc>,
}

/// Creation body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub contest_id: RecordId,
    pub participant_email: String,
    #[serde(default)]
    pub participant_name: Option<String>,
    #[serde(default)]
    pub submission_data: String,
}

impl NewSubmission {
    pub fn into_submission(self, created_at: DateTime<Utc>) -> Submission {
        Submission {
            id: RecordId::new(),
            contest_id: self.contest_id,
            participant_email: self.participant_email,
            participant_name: self.participant_name,
            submission_data: self.submission_data,
            is_winner: false,
            created_at,
        }
    }
}

/// Winner-flag-only update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerPatch {
    pub is_winner: bool,
}

/// Content-only update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContentPatch {
    pub submission_data: String,
}
