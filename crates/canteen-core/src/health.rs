use axum::http::StatusCode;

/// Handler for `GET /healthz`: the process is up and serving.
///
/// Readiness depends on each service's storage, so `/readyz` lives with the
/// service state.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
