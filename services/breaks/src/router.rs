use axum::{
    Router,
    routing::{get, patch},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use canteen_core::health::healthz;
use canteen_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    break_def::{create_break, delete_break, list_breaks, update_break},
    health::readyz,
    status::get_break_status,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Breaks
        .route("/breaks", get(list_breaks).post(create_break))
        .route("/breaks/status", get(get_break_status))
        .route("/breaks/{id}", patch(update_break).delete(delete_break))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
}
