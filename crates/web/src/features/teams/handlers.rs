use axum::{
    Json,
    extract::{Query, State},
};
use storage::{dto::team::TeamFilter, models::Team};

use crate::auth::AuthenticatedJudge;
use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/teams",
    params(TeamFilter),
    responses(
        (status = 200, description = "List teams, optionally filtered by owning judge", body = Vec<Team>)
    ),
    tag = "teams"
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(filter): Query<TeamFilter>,
) -> Result<Json<Vec<Team>>, WebError> {
    let teams = state.repos.teams.list(&filter).await?;

    Ok(Json(teams))
}

#[utoipa::path(
    get,
    path = "/api/teams/mine",
    security(
        ("judge_token" = [])
    ),
    responses(
        (status = 200, description = "Teams assigned to the authenticated judge", body = Vec<Team>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "teams"
)]
pub async fn list_my_teams(
    State(state): State<AppState>,
    AuthenticatedJudge(judge): AuthenticatedJudge,
) -> Result<Json<Vec<Team>>, WebError> {
    let teams = state
        .repos
        .teams
        .list(&TeamFilter::for_judge(judge.judge_id))
        .await?;

    Ok(Json(teams))
}
