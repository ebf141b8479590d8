use axum::{
    Json,
    extract::{Path, Query, State},
};
use storage::dto::competition::{CompetitionFilter, CompetitionResponse};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    params(CompetitionFilter),
    responses(
        (status = 200, description = "List competitions, optionally filtered by active/running flags", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(state): State<AppState>,
    Query(filter): Query<CompetitionFilter>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions =
        services::list_competitions(state.repos.competitions.as_ref(), &filter).await?;

    let response: Vec<CompetitionResponse> = competitions
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = i64, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompetitionResponse>, WebError> {
    let competition = services::get_competition(state.repos.competitions.as_ref(), id).await?;

    Ok(Json(CompetitionResponse::from(competition)))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/start",
    params(
        ("id" = i64, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition started and judges notified", body = CompetitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Already running, or another competition is running")
    ),
    tag = "competitions"
)]
pub async fn start_competition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompetitionResponse>, WebError> {
    let competition = services::start_competition(
        &state.lifecycle,
        state.repos.judges.as_ref(),
        &state.dispatcher,
        id,
    )
    .await?;

    Ok(Json(CompetitionResponse::from(competition)))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/stop",
    params(
        ("id" = i64, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition stopped and judges notified", body = CompetitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Competition is not running")
    ),
    tag = "competitions"
)]
pub async fn stop_competition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompetitionResponse>, WebError> {
    let competition = services::stop_competition(
        &state.lifecycle,
        state.repos.judges.as_ref(),
        &state.dispatcher,
        id,
    )
    .await?;

    Ok(Json(CompetitionResponse::from(competition)))
}
