use axum::{Router, routing::get};

use super::handlers::{list_my_teams, list_teams};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams))
        .route("/mine", get(list_my_teams))
}
