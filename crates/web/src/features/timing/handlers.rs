use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use storage::dto::time_record::{SubmitTimesRequest, SubmitTimesResponse};

use crate::auth::AuthenticatedJudge;
use crate::error::WebError;
use crate::state::AppState;

/// Batch arrival-time submission.
///
/// Only the first 15 entries are stored; the rest are dropped silently.
#[utoipa::path(
    post,
    path = "/api/enviar_tiempos",
    request_body = SubmitTimesRequest,
    security(
        ("judge_token" = [])
    ),
    responses(
        (status = 201, description = "Records created, identities in input order", body = SubmitTimesResponse),
        (status = 400, description = "Malformed body or unknown team"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Team is not assigned to this judge")
    ),
    tag = "timing"
)]
pub async fn submit_times(
    State(state): State<AppState>,
    AuthenticatedJudge(judge): AuthenticatedJudge,
    payload: Result<Json<SubmitTimesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitTimesResponse>), WebError> {
    let Json(req) = payload.map_err(|e| WebError::BadRequest(e.body_text()))?;

    let created = state
        .registration
        .register_batch(judge.judge_id, req.team_id, req.entries)
        .await?;

    Ok((StatusCode::CREATED, Json(SubmitTimesResponse { created })))
}
