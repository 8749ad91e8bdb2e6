use axum::{Json, extract::State};
use serde::Serialize;

use canteen_auth_types::identity::IdentityHeaders;

use crate::handlers::break_def::BreakResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BreakStatusResponse {
    pub active_break: Option<BreakResponse>,
    /// Milliseconds.
    pub time_remaining: i64,
    pub is_break_active: bool,
    pub loading: bool,
}

// ── GET /breaks/status ───────────────────────────────────────────────────────

pub async fn get_break_status(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Json<BreakStatusResponse> {
    let status = state.status.borrow().clone();
    Json(BreakStatusResponse {
        active_break: status
            .active_break
            .map(|b| BreakResponse::from_definition(b, &state)),
        time_remaining: status.time_remaining,
        is_break_active: status.is_break_active,
        loading: status.loading,
    })
}
