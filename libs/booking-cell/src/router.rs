use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/slots/{slot_id}/book", post(handlers::book_slot))
        .route(
            "/appointments/{appointment_id}",
            get(handlers::get_appointment).delete(handlers::cancel_appointment),
        )
        .with_state(state)
}
