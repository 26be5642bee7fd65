//! Contest handlers

use super::parse_id;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use hub_core::{
    Contest, ContestEdit, ContestFilter, ContestStatus, DeleteOutcome, InsertOutcome, NewContest,
    StatusPatch, UpdateOutcome, POPULAR_CONTESTS_LIMIT,
};
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Default, Deserialize)]
pub struct PopularQuery {
    #[serde(default)]
    pub status: Option<ContestStatus>,
}

/// `GET /contests?status&creatorEmail`, newest first
#[instrument(skip(state))]
pub async fn list_contests(
    State(state): State<AppState>,
    Query(filter): Query<ContestFilter>,
) -> ApiResult<Json<Vec<Contest>>> {
    Ok(Json(state.store.list_contests(&filter).await?))
}

/// `GET /contests/{id}`. Missing contests serialize as `null`.
#[instrument(skip(state))]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Contest>>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.find_contest(id).await?))
}

/// `GET /popular-contests?status`
#[instrument(skip(state))]
pub async fn popular_contests(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Json<Vec<Contest>>> {
    let contests = state
        .store
        .popular_contests(query.status, POPULAR_CONTESTS_LIMIT)
        .await?;
    Ok(Json(contests))
}

/// `POST /contests`
#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_contest(
    State(state): State<AppState>,
    Json(body): Json<NewContest>,
) -> ApiResult<Json<InsertOutcome>> {
    let outcome = state
        .store
        .insert_contest(body.into_contest(Utc::now()))
        .await?;
    info!("Created contest {}", outcome.inserted_id);
    Ok(Json(outcome))
}

/// `PATCH /contests/edit/{id}`
#[instrument(skip(state, edit))]
pub async fn edit_contest(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edit): Json<ContestEdit>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.edit_contest(id, edit).await?))
}

/// `PATCH /contest/{id}/status`
#[instrument(skip(state))]
pub async fn update_contest_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<StatusPatch>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.update_contest_status(id, patch).await?))
}

/// `DELETE /contest/{id}`
#[instrument(skip(state))]
pub async fn delete_contest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.delete_contest(id).await?))
}
