use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use canteen_breaks::domain::types::BreakStatus;
use canteen_core::middleware::REQUEST_ID_HEADER;
use canteen_testing::auth::MockAuth;

use crate::helpers::{authed, definition, server, server_with_status};

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_healthy() {
    server().get("/healthz").await.assert_status_ok();
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    server()
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_attach_request_id_to_responses() {
    let response = server().get("/healthz").await;
    let id = response.header(REQUEST_ID_HEADER);
    assert!(id.to_str().unwrap().parse::<Uuid>().is_ok());
}

// ── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_requests_without_identity() {
    server()
        .get("/breaks")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server()
        .get("/breaks/status")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_members_from_editing_breaks() {
    let server = server();
    let member = MockAuth::member();

    authed(server.post("/breaks"), &member)
        .json(&json!({ "name": "Lunch", "start": "12:30", "end": "13:15" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let path = format!("/breaks/{}", Uuid::now_v7());
    authed(server.patch(&path), &member)
        .json(&json!({ "name": "Brunch" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    authed(server.delete(&path), &member)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_out_of_range_time() {
    let response = authed(server().post("/breaks"), &MockAuth::staff())
        .json(&json!({ "name": "Lunch", "start": "24:00", "end": "13:15" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "kind": "INVALID_TIME_OF_DAY",
        "message": "invalid time of day for start",
    }));
}

#[tokio::test]
async fn should_reject_zero_length_window() {
    let response = authed(server().post("/breaks"), &MockAuth::admin())
        .json(&json!({ "name": "Lunch", "start": "12:00", "end": "12:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["kind"], "INVALID_BREAK_WINDOW");
}

#[tokio::test]
async fn should_reject_invalid_time_on_update() {
    let path = format!("/breaks/{}", Uuid::now_v7());
    let response = authed(server().patch(&path), &MockAuth::staff())
        .json(&json!({ "end": "noon" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<serde_json::Value>()["message"],
        "invalid time of day for end"
    );
}

#[tokio::test]
async fn should_hide_storage_failures() {
    let response = authed(server().post("/breaks"), &MockAuth::staff())
        .json(&json!({ "name": "Lunch", "start": "12:30", "end": "13:15" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<serde_json::Value>()["kind"], "INTERNAL");
}

// ── Status ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_loading_before_first_catalog() {
    let response = authed(server().get("/breaks/status"), &MockAuth::member()).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "active_break": null,
        "time_remaining": 0,
        "is_break_active": false,
        "loading": true,
    }));
}

#[tokio::test]
async fn should_report_active_break() {
    let lunch = definition("Lunch", "12:30", "13:15");
    let server = server_with_status(BreakStatus::active(lunch.clone(), 90_000));

    let body = authed(server.get("/breaks/status"), &MockAuth::member())
        .await
        .json::<serde_json::Value>();

    assert_eq!(body["is_break_active"], true);
    assert_eq!(body["loading"], false);
    assert_eq!(body["time_remaining"], 90_000);
    assert_eq!(body["active_break"]["id"], lunch.id.to_string());
    assert_eq!(body["active_break"]["name"], "Lunch");
}
