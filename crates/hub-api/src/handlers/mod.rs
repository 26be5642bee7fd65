//! # Request Handlers
//!
//! Axum request handlers, one module per resource. Handlers translate a
//! request into store or provider calls and return the result as JSON.

pub mod contests;
pub mod payments;
pub mod submissions;
pub mod users;

use axum::{response::IntoResponse, Json};
use hub_core::{HubResult, RecordId};
use serde::Serialize;

/// `{ message }` body for the handled "already exists" outcomes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Path ids must be valid document ids; anything else is a 400.
fn parse_id(raw: &str) -> HubResult<RecordId> {
    RecordId::parse(raw)
}

/// Root status text
pub async fn root() -> &'static str {
    "Contest is loading"
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "contest-hub",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
