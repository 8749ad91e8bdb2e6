use sea_orm::Database;
use tracing::info;

use canteen_core::config::Config;
use canteen_core::tracing::init_tracing;
use canteen_notifications::config::NotificationsConfig;
use canteen_notifications::infra::fcm::FcmPushProvider;
use canteen_notifications::router::build_router;
use canteen_notifications::state::{AppState, FanoutSettings};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = NotificationsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let push = FcmPushProvider::new(
        reqwest::Client::new(),
        &config.fcm_endpoint,
        &config.fcm_project_id,
        config.fcm_access_token.clone(),
        config.fcm_max_in_flight,
    );

    let state = AppState {
        db,
        push,
        fanout: FanoutSettings {
            target_role: config.notify_target_role,
            batch_size: config.batch_size(),
        },
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.notifications_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("notifications service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
