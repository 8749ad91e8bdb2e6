use chrono::Utc;
use uuid::Uuid;

use canteen_domain::pagination::PageRequest;
use canteen_domain::user::UserRole;

use crate::domain::repository::{DeliveryLogRepository, NotificationRepository, UserRepository};
use crate::domain::types::{
    DeliveryLog, MAX_MESSAGE_LEN, MAX_PAYLOAD_BYTES, MAX_TITLE_LEN, Notification, PushMessage,
};
use crate::error::NotificationsServiceError;

// ── CreateNotification ───────────────────────────────────────────────────────

pub struct CreateNotificationInput {
    pub title: String,
    pub message: String,
}

pub struct CreateNotificationUseCase<N: NotificationRepository, U: UserRepository> {
    pub notifications: N,
    pub users: U,
}

impl<N: NotificationRepository, U: UserRepository> CreateNotificationUseCase<N, U> {
    /// Persist a new notification on behalf of `sender_id`. The sender's
    /// display name is read from the user directory.
    pub async fn execute(
        &self,
        sender_id: Uuid,
        sender_role: UserRole,
        input: CreateNotificationInput,
    ) -> Result<Notification, NotificationsServiceError> {
        let title = validate_text(&input.title, MAX_TITLE_LEN, "title")?;
        let message = validate_text(&input.message, MAX_MESSAGE_LEN, "message")?;

        let sender = self
            .users
            .find_by_id(sender_id)
            .await?
            .ok_or(NotificationsServiceError::SenderNotFound)?;

        let notification = Notification {
            id: Uuid::now_v7(),
            title,
            message,
            sender_id,
            sender_name: sender.name,
            sender_role,
            created_at: Utc::now(),
        };
        if PushMessage::for_notification(&notification).payload_bytes() > MAX_PAYLOAD_BYTES {
            return Err(NotificationsServiceError::InvalidNotification("message"));
        }
        self.notifications.create(&notification).await?;
        tracing::info!(
            notification_id = %notification.id,
            sender_id = %sender_id,
            "notification created"
        );
        Ok(notification)
    }
}

// ── GetNotification ──────────────────────────────────────────────────────────

pub struct GetNotificationUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> GetNotificationUseCase<N> {
    pub async fn execute(&self, id: Uuid) -> Result<Notification, NotificationsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(NotificationsServiceError::NotificationNotFound)
    }
}

// ── ListNotifications ────────────────────────────────────────────────────────

pub struct ListNotificationsUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> ListNotificationsUseCase<N> {
    pub async fn execute(
        &self,
        page: PageRequest,
    ) -> Result<Vec<Notification>, NotificationsServiceError> {
        self.repo.list(page.clamped()).await
    }
}

// ── GetDeliveryLogs ──────────────────────────────────────────────────────────

pub struct GetDeliveryLogsUseCase<N: NotificationRepository, L: DeliveryLogRepository> {
    pub notifications: N,
    pub logs: L,
}

impl<N: NotificationRepository, L: DeliveryLogRepository> GetDeliveryLogsUseCase<N, L> {
    pub async fn execute(
        &self,
        notification_id: Uuid,
    ) -> Result<Vec<DeliveryLog>, NotificationsServiceError> {
        if self.notifications.find_by_id(notification_id).await?.is_none() {
            return Err(NotificationsServiceError::NotificationNotFound);
        }
        self.logs.list_for_notification(notification_id).await
    }
}

fn validate_text(
    text: &str,
    max_len: usize,
    field: &'static str,
) -> Result<String, NotificationsServiceError> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > max_len {
        return Err(NotificationsServiceError::InvalidNotification(field));
    }
    Ok(text.to_owned())
}
