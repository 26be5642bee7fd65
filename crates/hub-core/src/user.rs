//! # User Types
//!
//! Registered platform users and the role-only patch applied by admins.

use crate::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform role
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Regular participant (assigned on registration)
    #[default]
    User,
    /// May create contests
    Creator,
    /// May manage users and contests
    Admin,
    /// Any other role an admin assigns; stored verbatim
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Creator => "creator",
            Role::Admin => "admin",
            Role::Other(role) => role,
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "user" => Role::User,
            "creator" => Role::Creator,
            "admin" => Role::Admin,
            _ => Role::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unique across all users
    pub email: String,

    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub role: Role,

    pub created_at: DateTime<Utc>,
}

/// Registration body. Any role the caller sends is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

impl NewUser {
    /// Build the stored record with the default role
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        User {
            id: RecordId::new(),
            name: self.name,
            email: self.email,
            photo_url: self.photo_url,
            role: Role::default(),
            created_at,
        }
    }
}

/// Role-only update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePatch {
    pub role: Role,
}
