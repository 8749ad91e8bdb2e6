use std::time::Duration;

use chrono::Local;
use sea_orm::Database;
use tokio::sync::watch;
use tracing::info;

use canteen_breaks::catalog::{BreakCatalog, refresh_periodically};
use canteen_breaks::config::BreaksConfig;
use canteen_breaks::domain::types::BreakStatus;
use canteen_breaks::infra::db::{DbBreakEventLog, DbBreakRepository};
use canteen_breaks::router::build_router;
use canteen_breaks::state::AppState;
use canteen_breaks::watcher::BreakStatusWatcher;
use canteen_core::config::Config;
use canteen_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = BreaksConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // The first refresh tick fires immediately and delivers the initial catalog.
    let catalog = BreakCatalog::new();
    tokio::spawn(refresh_periodically(
        catalog.clone(),
        DbBreakRepository { db: db.clone() },
        Duration::from_secs(config.breaks_refresh_secs.max(1)),
    ));

    let (status_tx, status_rx) = watch::channel(BreakStatus::loading());
    tokio::spawn(BreakStatusWatcher::new(Local).run(
        catalog.subscribe(),
        status_tx,
        DbBreakEventLog { db: db.clone() },
        Duration::from_millis(config.breaks_tick_millis.max(1)),
    ));

    let state = AppState {
        db,
        catalog,
        status: status_rx,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.breaks_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("breaks service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
