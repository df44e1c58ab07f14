pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route(
            "/api/v1/screening/applications",
            post(handlers::handle_screen_application),
        )
        .route(
            "/api/v1/screening/applications/upload",
            post(handlers::handle_screen_upload),
        )
        .route(
            "/api/v1/screening/jobs/rank",
            post(handlers::handle_rank_candidates),
        )
        .route("/api/v1/screening/demo", get(handlers::handle_demo))
        .with_state(state)
}
