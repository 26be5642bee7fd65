//! # Contest Hub
//!
//! REST backend for hosting paid contests.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export MONGODB_URI=mongodb://localhost:27017
//! export SITE_DOMAIN=http://localhost:5173
//!
//! # Run the server (STORE_BACKEND=memory skips MongoDB)
//! contest-hub
//! ```

use hub_api::{routes, AppConfig, AppState, StoreBackend};
use hub_core::{MemoryStore, SharedProvider, SharedStore};
use hub_mongo::{MongoConfig, MongoStore};
use hub_stripe::{StripeCheckoutProvider, REQUIRED_WEBHOOK_EVENTS};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    let provider = StripeCheckoutProvider::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
    if provider.config().is_test_mode() {
        info!("Stripe mode: test");
    } else {
        info!("Stripe mode: live");
    }
    if provider.config().webhook_secret.is_none() {
        warn!("STRIPE_WEBHOOK_SECRET not set; /webhook/stripe will reject deliveries");
    }
    info!("Webhook events to enable: {}", REQUIRED_WEBHOOK_EVENTS.join(", "));
    let provider: SharedProvider = Arc::new(provider);

    let (store, mongo) = match config.store_backend {
        StoreBackend::Mongo => {
            let mongo = Arc::new(MongoStore::connect(&MongoConfig::from_env()?).await?);
            let store: SharedStore = mongo.clone();
            (store, Some(mongo))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on shutdown");
            let store: SharedStore = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    info!("Environment: {}", config.environment);
    info!("Store backend: {:?}", config.store_backend);
    info!("Checkout redirects to: {}", config.site_domain);

    let state = AppState::new(store, provider, config);
    let app = routes::create_router(state);

    info!("Contest Hub starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/create-checkout-session", addr);
        info!("Webhook: POST http://{}/webhook/stripe", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(mongo) = mongo {
        mongo.shutdown().await;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_banner() {
    println!(
        r#"
  Contest Hub
  ━━━━━━━━━━━━━━━━━━━━━━━
  Contests, entries, and entry fees
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
