//! # Error Types
//!
//! Typed error handling for the contest-hub backend.
//! Store, processor, and handler operations all return `Result<T, HubError>`.

use thiserror::Error;

/// Core error type shared by every layer
#[derive(Debug, Error)]
pub enum HubError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A path or body value is not a valid document identifier
    #[error("Invalid document id: {value}")]
    InvalidId { value: String },

    /// Price is negative or not a finite number
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Unique constraint violated by an insert
    #[error("Duplicate {collection} record: {key}")]
    Duplicate {
        collection: &'static str,
        key: String,
    },

    /// Document store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Checkout session unknown to the provider
    #[error("Session not found or expired: {session_id}")]
    SessionNotFound { session_id: String },

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns true if this error is a unique-constraint violation
    pub fn is_duplicate(&self) -> bool {
        matches!(self, HubError::Duplicate { .. })
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            HubError::Configuration(_) => 500,
            HubError::InvalidRequest(_) => 400,
            HubError::InvalidId { .. } => 400,
            HubError::InvalidPrice { .. } => 400,
            HubError::Duplicate { .. } => 409,
            HubError::Store(_) => 500,
            HubError::ProviderError { .. } => 502,
            HubError::NetworkError(_) => 503,
            HubError::SessionNotFound { .. } => 404,
            HubError::WebhookVerificationFailed(_) => 401,
            HubError::WebhookParseError(_) => 400,
            HubError::Serialization(_) => 500,
            HubError::Internal(_) => 500,
        }
    }
}

/// Result type alias for hub operations
pub type HubResult<T> = Result<T, HubError>;
