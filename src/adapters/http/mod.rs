pub mod routes;
pub mod state;

use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/pick/status", get(routes::pick_status))
        .route("/api/pick/start", post(routes::pick_start))
        .route("/api/pick/stop", post(routes::pick_stop))
        .route("/api/pick/events", get(routes::pick_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
