//! # Document Identifiers
//!
//! `RecordId` is the one identifier type used for every stored record and
//! every cross-record reference (a submission's contest, a payment's contest).
//! It wraps the store-native ObjectId and travels over JSON as a 24-character
//! hex string.

use crate::error::{HubError, HubResult};
use bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Store-native document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a 24-character hex identifier
    pub fn parse(value: &str) -> HubResult<Self> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| HubError::InvalidId {
                value: value.to_string(),
            })
    }

    /// The wrapped ObjectId
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Hex representation
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<RecordId> for ObjectId {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl FromStr for RecordId {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RecordId::parse(&raw).map_err(|_| de::Error::custom(format!("invalid document id: {raw}")))
    }
}
