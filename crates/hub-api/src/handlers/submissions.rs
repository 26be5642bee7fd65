//! Submission handlers

use super::{parse_id, MessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use hub_core::{
    DeleteOutcome, HubError, NewSubmission, Submission, SubmissionContentPatch, UpdateOutcome,
    WinnerPatch, WINNER_FEED_LIMIT,
};
use tracing::{info, instrument};

/// `GET /contest-winner`
#[instrument(skip(state))]
pub async fn contest_winners(State(state): State<AppState>) -> ApiResult<Json<Vec<Submission>>> {
    Ok(Json(state.store.winning_submissions(WINNER_FEED_LIMIT).await?))
}

/// `GET /submissions/contest/{contestId}`
#[instrument(skip(state))]
pub async fn submissions_for_contest(
    State(state): State<AppState>,
    Path(contest_id): Path<String>,
) -> ApiResult<Json<Vec<Submission>>> {
    let contest_id = parse_id(&contest_id)?;
    Ok(Json(state.store.submissions_for_contest(contest_id).await?))
}

/// `GET /submissions/{email}`
#[instrument(skip(state))]
pub async fn submissions_for_participant(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<Submission>>> {
    Ok(Json(state.store.submissions_for_participant(&email).await?))
}

/// `POST /submissions`. A repeat entry for the same contest is a 409.
#[instrument(skip(state, body), fields(contest_id = %body.contest_id, email = %body.participant_email))]
pub async fn create_submission(
    State(state): State<AppState>,
    Json(body): Json<NewSubmission>,
) -> Result<Response, ApiError> {
    match state
        .store
        .insert_submission(body.into_submission(Utc::now()))
        .await
    {
        Ok(outcome) => {
            info!("Recorded submission {}", outcome.inserted_id);
            Ok(Json(outcome).into_response())
        }
        Err(HubError::Duplicate { .. }) => Ok((
            StatusCode::CONFLICT,
            Json(MessageResponse::new(
                "You have already submitted to this contest",
            )),
        )
            .into_response()),
        Err(e) => Err(ApiError(e)),
    }
}

/// `PATCH /submission/{id}`
#[instrument(skip(state))]
pub async fn set_winner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WinnerPatch>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.set_winner(id, patch).await?))
}

/// `PATCH /submissions/{id}`
#[instrument(skip(state, patch))]
pub async fn update_submission_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SubmissionContentPatch>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.update_submission_content(id, patch).await?))
}

/// `DELETE /submission/{id}`
#[instrument(skip(state))]
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.delete_submission(id).await?))
}
