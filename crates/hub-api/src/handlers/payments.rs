//! Payment handlers: hosted checkout, confirmation, webhook, and queries.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use hub_core::{
    confirm_checkout, CheckoutRequest, Confirmation, HubError, InsertOutcome, Payment,
    PaymentFilter, UpdateOutcome, WebhookEventType,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    pub session_id: String,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutUrlResponse {
    /// Hosted checkout page (redirect the payer here)
    pub url: String,
}

/// Body of `PATCH /payment-success`, one shape per confirmation outcome
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ConfirmResponse {
    #[serde(rename_all = "camelCase")]
    AlreadyExists {
        message: String,
        transaction_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Recorded {
        success: bool,
        transaction_id: String,
        modify_contest: UpdateOutcome,
        payment_info: InsertOutcome,
    },
    NotPaid { success: bool },
}

impl From<Confirmation> for ConfirmResponse {
    fn from(confirmation: Confirmation) -> Self {
        match confirmation {
            Confirmation::AlreadyProcessed { transaction_id } => Self::AlreadyExists {
                message: "already exists".to_string(),
                transaction_id,
            },
            Confirmation::Recorded {
                transaction_id,
                payment,
                contest_update,
            } => Self::Recorded {
                success: true,
                transaction_id,
                modify_contest: contest_update,
                payment_info: payment,
            },
            Confirmation::NotPaid { .. } => Self::NotPaid { success: true },
        }
    }
}

/// `GET /transaction/{email}`, newest first
#[instrument(skip(state))]
pub async fn transactions_for_customer(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<Payment>>> {
    Ok(Json(state.store.payments_for_customer(&email).await?))
}

/// `GET /payments?customerEmail&contestId`. No match serializes as `null`.
#[instrument(skip(state))]
pub async fn find_payment(
    State(state): State<AppState>,
    Query(filter): Query<PaymentFilter>,
) -> ApiResult<Json<Option<Payment>>> {
    Ok(Json(state.store.find_payment(&filter).await?))
}

/// `POST /create-checkout-session`. Nothing is stored until confirmation.
#[instrument(skip(state, request), fields(contest_id = %request.contest_id, price = request.price))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutUrlResponse>> {
    let session = state
        .provider
        .create_checkout(&request, &state.settings)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            e
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CheckoutUrlResponse {
        url: session.checkout_url,
    }))
}

/// `PATCH /payment-success?session_id=...`
#[instrument(skip(state))]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<Json<ConfirmResponse>> {
    let confirmation = confirm_checkout(
        state.store.as_ref(),
        state.provider.as_ref(),
        &state.settings,
        &query.session_id,
    )
    .await?;

    Ok(Json(confirmation.into()))
}

/// `POST /webhook/stripe`. Completed checkouts run the same confirmation as
/// the redirect, so whichever arrives second finds the payment recorded.
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError(HubError::InvalidRequest(
                "Missing Stripe-Signature header".to_string(),
            ))
        })?;

    let event = state
        .provider
        .verify_webhook(&body, signature)
        .await
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            e
        })?;

    info!(
        "Received webhook: type={:?}, id={}",
        event.event_type, event.event_id
    );

    match (&event.event_type, event.session_id.as_deref()) {
        (WebhookEventType::CheckoutCompleted, Some(session_id)) => {
            let confirmation = confirm_checkout(
                state.store.as_ref(),
                state.provider.as_ref(),
                &state.settings,
                session_id,
            )
            .await?;
            info!("Webhook confirmation for {}: {:?}", session_id, confirmation);
        }
        (WebhookEventType::CheckoutCompleted, None) => {
            return Err(ApiError(HubError::WebhookParseError(
                "checkout.session.completed without a session id".to_string(),
            )));
        }
        (WebhookEventType::Other(kind), _) => {
            info!("Ignoring webhook event {}", kind);
        }
    }

    Ok(StatusCode::OK)
}
