pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::parsing::handlers as parsing;
use crate::pipeline::handlers as pipeline;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Parsing of already-generated responses
        .route("/api/v1/responses/parse", post(parsing::handle_parse))
        .route("/api/v1/responses/csv", post(parsing::handle_parse_csv))
        // Search + full runs
        .route("/api/v1/search/pages", get(pipeline::handle_total_pages))
        .route("/api/v1/runs", post(pipeline::handle_run))
        .with_state(state)
}
