pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::state::AppState;
use crate::template::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Templates
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        // CV generation
        .route("/api/v1/cv/validate", post(cv::handle_validate))
        .route("/api/v1/cv/generate", post(cv::handle_generate))
        .with_state(state)
}
