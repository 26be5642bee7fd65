//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the document store, the checkout provider, and checkout settings,
//! each built once in `main` and cloned into every handler.

use hub_core::{CheckoutSettings, HubError, SharedProvider, SharedStore};
use std::net::SocketAddr;
use std::str::FromStr;

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            other => Err(HubError::Configuration(format!(
                "STORE_BACKEND must be 'mongo' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public site the checkout redirects back to
    pub site_domain: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Store implementation
    pub store_backend: StoreBackend,
}

impl AppConfig {
    /// Load from environment variables, falling back to the defaults.
    pub fn from_env() -> Result<Self, HubError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(p) => p
                .parse()
                .map_err(|_| HubError::Configuration(format!("PORT is not a valid port: {}", p)))?,
            Err(_) => defaults.port,
        };
        let store_backend = match std::env::var("STORE_BACKEND") {
            Ok(b) => b.parse()?,
            Err(_) => defaults.store_backend,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            site_domain: std::env::var("SITE_DOMAIN").unwrap_or(defaults.site_domain),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            store_backend,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, HubError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| HubError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            site_domain: "http://localhost:5173".to_string(),
            environment: "development".to_string(),
            store_backend: StoreBackend::Mongo,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store
    pub store: SharedStore,
    /// Hosted-checkout provider
    pub provider: SharedProvider,
    /// Currency, unit conversion, and redirect URLs
    pub settings: CheckoutSettings,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: SharedStore, provider: SharedProvider, config: AppConfig) -> Self {
        Self {
            store,
            provider,
            settings: CheckoutSettings::new(config.site_domain.clone()),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.site_domain, "http://localhost:5173");
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("MongoDB".parse::<StoreBackend>().unwrap(), StoreBackend::Mongo);
        assert!("postgres".parse::<StoreBackend>().is_err());
    }
}
