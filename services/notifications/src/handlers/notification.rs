use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use canteen_auth_types::identity::IdentityHeaders;
use canteen_domain::pagination::PageRequest;
use canteen_domain::user::UserRole;

use crate::domain::types::{DeliveryLog, FanoutReport, Notification};
use crate::error::NotificationsServiceError;
use crate::state::AppState;
use crate::usecase::notification::{
    CreateNotificationInput, CreateNotificationUseCase, GetDeliveryLogsUseCase,
    GetNotificationUseCase, ListNotificationsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_role: UserRole,
    #[serde(serialize_with = "canteen_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title,
            message: n.message,
            sender_id: n.sender_id.to_string(),
            sender_name: n.sender_name,
            sender_role: n.sender_role,
            created_at: n.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct DeliveryLogResponse {
    pub id: String,
    pub user_id: String,
    pub success_count: u32,
    pub failure_count: u32,
    pub errors: Vec<String>,
    #[serde(serialize_with = "canteen_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<DeliveryLog> for DeliveryLogResponse {
    fn from(log: DeliveryLog) -> Self {
        Self {
            id: log.id(),
            user_id: log.user_id.to_string(),
            success_count: log.success_count,
            failure_count: log.failure_count,
            errors: log.errors,
            updated_at: log.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct FanoutReportResponse {
    pub notification_id: String,
    pub recipients: usize,
    pub tokens: usize,
    pub batches: usize,
    pub delivered: u32,
    pub failed: u32,
    pub pruned: usize,
}

impl From<FanoutReport> for FanoutReportResponse {
    fn from(r: FanoutReport) -> Self {
        Self {
            notification_id: r.notification_id.to_string(),
            recipients: r.recipients,
            tokens: r.tokens,
            batches: r.batches,
            delivered: r.delivered,
            failed: r.failed,
            pruned: r.pruned,
        }
    }
}

// ── POST /notifications ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
}

pub async fn create_notification(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), NotificationsServiceError> {
    if !identity.has_role(UserRole::Staff) {
        return Err(NotificationsServiceError::Forbidden);
    }
    let usecase = CreateNotificationUseCase {
        notifications: state.notification_repo(),
        users: state.user_repo(),
    };
    let notification = usecase
        .execute(
            identity.user_id,
            identity.role,
            CreateNotificationInput {
                title: body.title,
                message: body.message,
            },
        )
        .await?;
    state.spawn_fanout(notification.clone());
    Ok((StatusCode::CREATED, Json(notification.into())))
}

// ── GET /notifications ───────────────────────────────────────────────────────

pub async fn list_notifications(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<NotificationResponse>>, NotificationsServiceError> {
    let usecase = ListNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let notifications = usecase.execute(page).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

// ── GET /notifications/{id}/delivery-logs ────────────────────────────────────

pub async fn get_delivery_logs(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DeliveryLogResponse>>, NotificationsServiceError> {
    if !identity.has_role(UserRole::Staff) {
        return Err(NotificationsServiceError::Forbidden);
    }
    let usecase = GetDeliveryLogsUseCase {
        notifications: state.notification_repo(),
        logs: state.delivery_log_repo(),
    };
    let logs = usecase.execute(id).await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

// ── POST /notifications/{id}/redeliver ───────────────────────────────────────

pub async fn redeliver_notification(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FanoutReportResponse>, NotificationsServiceError> {
    if !identity.has_role(UserRole::Admin) {
        return Err(NotificationsServiceError::Forbidden);
    }
    let notification = GetNotificationUseCase {
        repo: state.notification_repo(),
    }
    .execute(id)
    .await?;
    let report = state.fanout_usecase().execute(&notification).await?;
    Ok(Json(report.into()))
}
