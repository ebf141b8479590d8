use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::features::{competitions, teams, timing};
use crate::realtime::socket::judge_socket;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/competitions",
            competitions::routes::routes(state.api_keys.clone()),
        )
        .nest("/api/teams", teams::routes::routes())
        .nest("/api", timing::routes::routes())
        .route("/ws/juez/:judge_id", get(judge_socket))
        .route("/ws/juez/:judge_id/", get(judge_socket))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
