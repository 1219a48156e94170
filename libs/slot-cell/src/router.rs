use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn slot_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_slots))
        .route("/generate", post(handlers::trigger_generation))
        .route("/{slot_id}", get(handlers::get_slot))
        .with_state(state)
}
