pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::reply::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate_reply", post(handlers::handle_generate_reply))
        .route("/feedback", post(handlers::handle_feedback))
        .route("/stats", get(handlers::handle_stats))
        .with_state(state)
}
