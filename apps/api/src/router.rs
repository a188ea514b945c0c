use std::sync::Arc;

use axum::{routing::get, Router};

use availability_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic availability API is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
}
