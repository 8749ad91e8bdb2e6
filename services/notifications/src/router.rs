use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use canteen_core::health::healthz;
use canteen_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::readyz,
    notification::{
        create_notification, get_delivery_logs, list_notifications, redeliver_notification,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Notifications
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/notifications/{id}/delivery-logs", get(get_delivery_logs))
        .route("/notifications/{id}/redeliver", post(redeliver_notification))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
}
