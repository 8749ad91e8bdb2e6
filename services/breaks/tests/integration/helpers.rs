use axum_test::{TestRequest, TestServer};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tokio::sync::watch;
use uuid::Uuid;

use canteen_breaks::catalog::BreakCatalog;
use canteen_breaks::domain::schedule::anchor_to_day;
use canteen_breaks::domain::types::{BreakDefinition, BreakStatus};
use canteen_breaks::router::build_router;
use canteen_breaks::state::AppState;
use canteen_domain::time_of_day::parse_time_of_day;
use canteen_testing::auth::MockAuth;

/// Router backed by a disconnected database and a fixed watcher status.
///
/// Only paths that fail before touching storage are meaningful here.
pub fn server_with_status(status: BreakStatus) -> TestServer {
    let (tx, rx) = watch::channel(status);
    // Receivers keep returning the last value after the sender is gone.
    drop(tx);
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        catalog: BreakCatalog::new(),
        status: rx,
    };
    TestServer::new(build_router(state)).unwrap()
}

pub fn server() -> TestServer {
    server_with_status(BreakStatus::loading())
}

pub fn authed(mut request: TestRequest, auth: &MockAuth) -> TestRequest {
    for (name, value) in auth.headers() {
        request = request.add_header(name, value);
    }
    request
}

pub fn school_tz() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

pub fn definition(name: &str, start: &str, end: &str) -> BreakDefinition {
    let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    BreakDefinition {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        start_time: anchor_to_day(day, parse_time_of_day(start).unwrap(), &school_tz()),
        end_time: anchor_to_day(day, parse_time_of_day(end).unwrap(), &school_tz()),
    }
}

/// Instant at local `hh:mm:ss` on a school day.
pub fn local(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    school_tz()
        .with_ymd_and_hms(2024, 9, 2, hour, minute, second)
        .unwrap()
        .with_timezone(&Utc)
}
