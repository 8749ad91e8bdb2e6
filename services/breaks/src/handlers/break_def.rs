use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use canteen_auth_types::identity::IdentityHeaders;
use canteen_domain::user::UserRole;

use crate::domain::schedule::time_of_day;
use crate::domain::types::BreakDefinition;
use crate::error::BreaksServiceError;
use crate::state::AppState;
use crate::usecase::break_def::{
    CreateBreakInput, CreateBreakUseCase, DeleteBreakUseCase, ListBreaksUseCase,
    UpdateBreakInput, UpdateBreakUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BreakResponse {
    pub id: String,
    pub name: String,
    /// Local `"HH:MM"`.
    pub start: String,
    pub end: String,
    /// Stored instants as epoch milliseconds; only their local time of day matters.
    #[serde(serialize_with = "canteen_core::serde::to_epoch_ms")]
    pub start_time: chrono::DateTime<Utc>,
    #[serde(serialize_with = "canteen_core::serde::to_epoch_ms")]
    pub end_time: chrono::DateTime<Utc>,
}

impl BreakResponse {
    pub fn from_definition(definition: BreakDefinition, state: &AppState) -> Self {
        let tz = state.tz();
        Self {
            id: definition.id.to_string(),
            start: time_of_day(definition.start_time, &tz).to_string(),
            end: time_of_day(definition.end_time, &tz).to_string(),
            name: definition.name,
            start_time: definition.start_time,
            end_time: definition.end_time,
        }
    }
}

// ── GET /breaks ──────────────────────────────────────────────────────────────

pub async fn list_breaks(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<BreakResponse>>, BreaksServiceError> {
    let usecase = ListBreaksUseCase {
        repo: state.break_repo(),
        tz: state.tz(),
    };
    let breaks = usecase.execute().await?;
    Ok(Json(
        breaks
            .into_iter()
            .map(|b| BreakResponse::from_definition(b, &state))
            .collect(),
    ))
}

// ── POST /breaks ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBreakRequest {
    pub name: String,
    pub start: String,
    pub end: String,
}

pub async fn create_break(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateBreakRequest>,
) -> Result<(StatusCode, Json<BreakResponse>), BreaksServiceError> {
    if !identity.has_role(UserRole::Staff) {
        return Err(BreaksServiceError::Forbidden);
    }
    let usecase = CreateBreakUseCase {
        repo: state.break_repo(),
        tz: state.tz(),
    };
    let created = usecase
        .execute(
            CreateBreakInput {
                name: body.name,
                start: body.start,
                end: body.end,
            },
            Utc::now(),
        )
        .await?;
    state.refresh_catalog().await;
    Ok((
        StatusCode::CREATED,
        Json(BreakResponse::from_definition(created, &state)),
    ))
}

// ── PATCH /breaks/{id} ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBreakRequest {
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn update_break(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBreakRequest>,
) -> Result<Json<BreakResponse>, BreaksServiceError> {
    if !identity.has_role(UserRole::Staff) {
        return Err(BreaksServiceError::Forbidden);
    }
    let usecase = UpdateBreakUseCase {
        repo: state.break_repo(),
        tz: state.tz(),
    };
    let updated = usecase
        .execute(
            id,
            UpdateBreakInput {
                name: body.name,
                start: body.start,
                end: body.end,
            },
            Utc::now(),
        )
        .await?;
    state.refresh_catalog().await;
    Ok(Json(BreakResponse::from_definition(updated, &state)))
}

// ── DELETE /breaks/{id} ──────────────────────────────────────────────────────

pub async fn delete_break(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BreaksServiceError> {
    if !identity.has_role(UserRole::Staff) {
        return Err(BreaksServiceError::Forbidden);
    }
    let usecase = DeleteBreakUseCase {
        repo: state.break_repo(),
    };
    usecase.execute(id).await?;
    state.refresh_catalog().await;
    Ok(StatusCode::NO_CONTENT)
}
