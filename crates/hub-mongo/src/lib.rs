//! # hub-mongo
//!
//! MongoDB persistence for the contest-hub backend.
//!
//! `MongoStore` implements every `hub_core` store trait against the
//! `users`, `contests`, `submissions` and `payments` collections.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hub_mongo::{MongoConfig, MongoStore};
//!
//! let store = MongoStore::connect(&MongoConfig::from_env()?).await?;
//! let contests = store.list_contests(&Default::default()).await?;
//! ```

pub mod config;
pub mod documents;
pub mod store;

// Re-exports
pub use config::MongoConfig;
pub use store::MongoStore;
