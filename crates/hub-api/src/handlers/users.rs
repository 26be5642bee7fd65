//! User handlers

use super::{parse_id, MessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use hub_core::{HubError, InsertOutcome, NewUser, Role, RolePatch, UpdateOutcome, User};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    Inserted(InsertOutcome),
    AlreadyExists(MessageResponse),
}

/// `GET /users`
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}

/// `GET /users/{email}/role`. Unknown users get the default role.
#[instrument(skip(state))]
pub async fn user_role(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .store
        .find_user_by_email(&email)
        .await?
        .map(|user| user.role)
        .unwrap_or_default();
    Ok(Json(RoleResponse { role }))
}

/// `POST /users`. A second registration for one email is answered, not inserted.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> ApiResult<Json<RegisterResponse>> {
    match state.store.insert_user(body.into_user(Utc::now())).await {
        Ok(outcome) => {
            info!("Registered user {}", outcome.inserted_id);
            Ok(Json(RegisterResponse::Inserted(outcome)))
        }
        Err(HubError::Duplicate { .. }) => Ok(Json(RegisterResponse::AlreadyExists(
            MessageResponse::new("user already exist"),
        ))),
        Err(e) => Err(ApiError(e)),
    }
}

/// `PATCH /user/{id}/role`
#[instrument(skip(state))]
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RolePatch>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.update_user_role(id, patch).await?))
}
