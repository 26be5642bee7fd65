//! # Contest Types
//!
//! Contests, their lifecycle status, and the two patch shapes that may touch
//! them from the outside: the creator's edit whitelist and the status-only
//! update. `participants_count` is only ever changed by payment confirmation.

use crate::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contest lifecycle status. Values outside the known set are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContestStatus {
    /// Awaiting admin review
    #[default]
    Pending,
    /// Approved and visible to participants
    Confirmed,
    /// Rejected by an admin
    Rejected,
    /// Winner declared
    Completed,
    Other(String),
}

impl ContestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ContestStatus::Pending => "pending",
            ContestStatus::Confirmed => "confirmed",
            ContestStatus::Rejected => "rejected",
            ContestStatus::Completed => "completed",
            ContestStatus::Other(status) => status,
        }
    }
}

impl From<String> for ContestStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "pending" => ContestStatus::Pending,
            "confirmed" => ContestStatus::Confirmed,
            "rejected" => ContestStatus::Rejected,
            "completed" => ContestStatus::Completed,
            _ => ContestStatus::Other(status),
        }
    }
}

impl From<ContestStatus> for String {
    fn from(status: ContestStatus) -> Self {
        match status {
            ContestStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

/// A stored contest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Entry fee in major currency units
    #[serde(default)]
    pub price: f64,

    /// Prize money in major currency units
    #[serde(default)]
    pub prize: f64,

    #[serde(default)]
    pub instruction: String,

    #[serde(rename = "type", default)]
    pub contest_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: ContestStatus,

    #[serde(default)]
    pub participants_count: i64,

    #[serde(default)]
    pub creator_email: String,

    pub created_at: DateTime<Utc>,
}

/// Creation body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
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
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<ContestStatus>,
    #[serde(default)]
    pub creator_email: String,
}

impl NewContest {
    /// Build the stored record. Participant count always starts at zero.
    pub fn into_contest(self, created_at: DateTime<Utc>) -> Contest {
        Contest {
            id: RecordId::new(),
            name: self.name,
            image: self.image,
            description: self.description,
            price: self.price,
            prize: self.prize,
            instruction: self.instruction,
            contest_type: self.contest_type,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status.unwrap_or_default(),
            participants_count: 0,
            creator_email: self.creator_email,
            created_at,
        }
    }
}

/// Creator-editable fields. Unknown keys (including `status` and
/// `participantsCount`) are dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub contest_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl ContestEdit {
    pub fn is_empty(&self) -> bool {
        *self == ContestEdit::default()
    }

    /// Apply present fields; returns true when anything changed.
    pub fn apply(&self, contest: &mut Contest) -> bool {
        let before = contest.clone();

        if let Some(name) = &self.name {
            contest.name = name.clone();
        }
        if let Some(image) = &self.image {
            contest.image = Some(image.clone());
        }
        if let Some(description) = &self.description {
            contest.description = description.clone();
        }
        if let Some(price) = self.price {
            contest.price = price;
        }
        if let Some(prize) = self.prize {
            contest.prize = prize;
        }
        if let Some(instruction) = &self.instruction {
            contest.instruction = instruction.clone();
        }
        if let Some(contest_type) = &self.contest_type {
            contest.contest_type = contest_type.clone();
        }
        if let Some(start) = self.start_time {
            contest.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            contest.end_time = Some(end);
        }

        *contest != before
    }
}

/// Status-only update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: ContestStatus,
}

/// Optional list filters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestFilter {
    #[serde(default)]
    pub status: Option<ContestStatus>,
    #[serde(default)]
    pub creator_email: Option<String>,
}

impl ContestFilter {
    pub fn matches(&self, contest: &Contest) -> bool {
        self.status.as_ref().map_or(true, |s| contest.status == *s)
            && self
                .creator_email
                .as_deref()
                .map_or(true, |email| contest.creator_email == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Contest {
        NewContest {
            name: "Logo Sprint".into(),
            image: None,
            description: "Design a logo".into(),
            price: 10.0,
            prize: 500.0,
            instruction: "SVG only".into(),
            contest_type: "Image Design".into(),
            start_time: None,
            end_time: None,
            status: None,
            creator_email: "c@x.com".into(),
        }
        .into_contest(Utc::now())
    }

    #[test]
    fn test_new_contest_defaults() {
        let contest = sample();
        assert_eq!(contest.status, ContestStatus::Pending);
        assert_eq!(contest.participants_count, 0);
    }

    #[test]
    fn test_edit_drops_protected_fields() {
        let body = serde_json::json!({
            "name": "Renamed",
            "status": "completed",
            "participantsCount": 99
        });
        let edit: ContestEdit = serde_json::from_value(body).unwrap();

        let mut contest = sample();
        assert!(edit.apply(&mut contest));
        assert_eq!(contest.name, "Renamed");
        assert_eq!(contest.status, ContestStatus::Pending);
        assert_eq!(contest.participants_count, 0);
    }

    #[test]
    fn test_edit_without_changes() {
        let mut contest = sample();
        let edit = ContestEdit {
            name: Some(contest.name.clone()),
            ..Default::default()
        };
        assert!(!edit.apply(&mut contest));
        assert!(ContestEdit::default().is_empty());
        assert!(!edit.is_empty());
    }

    #[test]
    fn test_filter_matching() {
        let contest = sample();
        assert!(ContestFilter::default().matches(&contest));
        assert!(ContestFilter {
            status: Some(ContestStatus::Pending),
            creator_email: Some("c@x.com".into()),
        }
        .matches(&contest));
        assert!(!ContestFilter {
            status: Some(ContestStatus::Confirmed),
            creator_email: None,
        }
        .matches(&contest));
    }

    #[test]
    fn test_contest_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "Image Design");
        assert_eq!(json["participantsCount"], 0);
        assert_eq!(json["creatorEmail"], "c@x.com");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_unlisted_status_kept_verbatim() {
        let patch: StatusPatch = serde_json::from_str(r#"{"status":"open"}"#).unwrap();
        assert_eq!(patch.status, ContestStatus::Other("open".into()));

        let filter = ContestFilter {
            status: Some(patch.status.clone()),
            creator_email: None,
        };
        assert!(!filter.matches(&sample()));

        let mut contest = sample();
        contest.status = patch.status;
        assert!(filter.matches(&contest));
        assert_eq!(serde_json::to_value(&contest).unwrap()["status"], "open");
    }

    #[test]
    fn test_new_contest_without_name() {
        let body = serde_json::json!({ "price": 5, "creatorEmail": "c@x.com" });
        let contest = serde_json::from_value::<NewContest>(body)
            .unwrap()
            .into_contest(Utc::now());
        assert_eq!(contest.name, "");
        assert_eq!(contest.price, 5.0);
    }
}
