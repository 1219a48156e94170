use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    // No delete route: the engine never removes schedules, and slots keep
    // their foreign key to the row that produced them.
    Router::new()
        .route("/", post(handlers::create_schedule).get(handlers::list_schedules))
        .route("/{schedule_id}", get(handlers::get_schedule).patch(handlers::update_schedule))
        .with_state(state)
}
