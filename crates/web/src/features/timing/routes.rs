use axum::{Router, routing::post};

use super::handlers::submit_times;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/enviar_tiempos", post(submit_times))
}
