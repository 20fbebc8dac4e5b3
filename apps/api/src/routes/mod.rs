pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/scenarios", get(handlers::handle_scenarios))
        .route("/api/evaluate", post(handlers::handle_evaluate))
        .route("/api/evaluate/score", post(handlers::handle_score))
        .route("/api/roadmap", post(handlers::handle_roadmap))
        .route("/api/assess", post(handlers::handle_assess))
        .with_state(state)
}
