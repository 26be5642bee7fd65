//! # MongoDB Configuration
//!
//! Connection settings loaded from environment variables.

use hub_core::HubError;
use std::env;

const DEFAULT_DATABASE: &str = "contesthub_db";

/// Connection settings
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Full connection string
    pub uri: String,
    /// Database holding the `users`, `contests`, `submissions`, `payments` collections
    pub database: String,
}

impl MongoConfig {
    /// Load configuration from environment variables.
    ///
    /// Either `MONGODB_URI`, or all of `DB_USER`, `DB_PASS` and `DB_CLUSTER`
    /// (an Atlas host such as `cluster0.abcde.mongodb.net`). `DB_NAME` is
    /// optional.
    pub fn from_env() -> Result<Self, HubError> {
        dotenvy::dotenv().ok();

        let database = env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());

        if let Ok(uri) = env::var("MONGODB_URI") {
            return Ok(Self { uri, database });
        }

        let required = |key: &str| {
            env::var(key).map_err(|_| {
                HubError::Configuration(format!("MONGODB_URI or {} must be set", key))
            })
        };
        let user = required("DB_USER")?;
        let pass = required("DB_PASS")?;
        let cluster = required("DB_CLUSTER")?;

        Ok(Self {
            uri: atlas_uri(&user, &pass, &cluster),
            database,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }
}

fn atlas_uri(user: &str, pass: &str, cluster: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=contest-hub",
        user, pass, cluster
    )
}
