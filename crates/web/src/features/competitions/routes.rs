use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{get_competition, list_competitions, start_competition, stop_competition};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:id/start", post(start_competition))
        .route("/:id/stop", post(stop_competition))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_competitions))
        .route("/:id", get(get_competition))
        .merge(protected)
}
