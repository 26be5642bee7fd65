//! # hub-api
//!
//! HTTP API layer for the contest-hub backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for users, contests, submissions, and payments
//! - Stripe webhook handling that converges with redirect confirmation
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Status text |
//! | GET | `/health` | Health check |
//! | GET | `/users` | List users |
//! | GET | `/users/{email}/role` | Role lookup (defaults to `user`) |
//! | POST | `/users` | Register user |
//! | PATCH | `/user/{id}/role` | Change role |
//! | GET | `/contests` | List contests (`status`, `creatorEmail`) |
//! | GET | `/contests/{id}` | Get contest or `null` |
//! | GET | `/popular-contests` | Top six by participants |
//! | POST | `/contests` | Create contest |
//! | PATCH | `/contests/edit/{id}` | Edit creator fields |
//! | PATCH | `/contest/{id}/status` | Change status |
//! | DELETE | `/contest/{id}` | Delete contest |
//! | GET | `/contest-winner` | Latest six winning submissions |
//! | GET | `/submissions/contest/{contestId}` | Submissions of a contest |
//! | GET | `/submissions/{email}` | Submissions of a participant |
//! | POST | `/submissions` | Submit entry (409 on repeat) |
//! | PATCH | `/submission/{id}` | Set winner flag |
//! | PATCH | `/submissions/{id}` | Replace entry content |
//! | DELETE | `/submission/{id}` | Delete submission |
//! | GET | `/transaction/{email}` | Payments of a payer |
//! | GET | `/payments` | One payment (`customerEmail`, `contestId`) or `null` |
//! | POST | `/create-checkout-session` | Start hosted checkout |
//! | PATCH | `/payment-success` | Confirm a checkout session |
//! | POST | `/webhook/stripe` | Stripe webhook |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppConfig, AppState, StoreBackend};
