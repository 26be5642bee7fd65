//! # Routes
//!
//! Axum router configuration for the contest-hub API.

use crate::handlers::{self, contests, payments, submissions, users};
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Users: `GET /users`, `GET /users/{email}/role`, `POST /users`,
///   `PATCH /user/{id}/role`
/// - Contests: `GET /contests`, `GET /contests/{id}`, `GET /popular-contests`,
///   `POST /contests`, `PATCH /contests/edit/{id}`, `PATCH /contest/{id}/status`,
///   `DELETE /contest/{id}`
/// - Submissions: `GET /contest-winner`, `GET /submissions/contest/{contestId}`,
///   `GET /submissions/{email}`, `POST /submissions`, `PATCH /submission/{id}`,
///   `PATCH /submissions/{id}`, `DELETE /submission/{id}`
/// - Payments: `GET /transaction/{email}`, `GET /payments`,
///   `POST /create-checkout-session`, `PATCH /payment-success`
/// - Webhooks: `POST /webhook/stripe`
pub fn create_router(state: AppState) -> Router {
    // The web client is served from a separate origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::register_user))
        .route("/users/{email}/role", get(users::user_role))
        .route("/user/{id}/role", patch(users::update_user_role));

    let contest_routes = Router::new()
        .route(
            "/contests",
            get(contests::list_contests).post(contests::create_contest),
        )
        .route("/contests/{id}", get(contests::get_contest))
        .route("/contests/edit/{id}", patch(contests::edit_contest))
        .route("/popular-contests", get(contests::popular_contests))
        .route("/contest/{id}/status", patch(contests::update_contest_status))
        .route("/contest/{id}", delete(contests::delete_contest));

    // `/submissions/{id}` is read as a participant email by GET and as a
    // submission id by PATCH
    let submission_routes = Router::new()
        .route("/contest-winner", get(submissions::contest_winners))
        .route("/submissions", post(submissions::create_submission))
        .route(
            "/submissions/contest/{contest_id}",
            get(submissions::submissions_for_contest),
        )
        .route(
            "/submissions/{id}",
            get(submissions::submissions_for_participant)
                .patch(submissions::update_submission_content),
        )
        .route(
            "/submission/{id}",
            patch(submissions::set_winner).delete(submissions::delete_submission),
        );

    let payment_routes = Router::new()
        .route("/transaction/{email}", get(payments::transactions_for_customer))
        .route("/payments", get(payments::find_payment))
        .route(
            "/create-checkout-session",
            post(payments::create_checkout_session),
        )
        .route("/payment-success", patch(payments::confirm_payment));

    // Webhook routes (must accept the raw body)
    let webhook_routes = Router::new().route("/stripe", post(payments::stripe_webhook));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(user_routes)
        .merge(contest_routes)
        .merge(submission_routes)
        .merge(payment_routes)
        .nest("/webhook", webhook_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
