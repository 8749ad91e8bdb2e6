#![allow(async_fn_in_trait)]

use uuid::Uuid;

use canteen_domain::pagination::PageRequest;
use canteen_domain::user::UserRole;

use crate::domain::types::{
    DeliveryLog, Notification, PushMessage, Recipient, SendResult, StaleToken, UserProfile,
};
use crate::error::NotificationsServiceError;

/// Repository for notification records.
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<(), NotificationsServiceError>;

    async fn find_by_id(&self, id: Uuid)
    -> Result<Option<Notification>, NotificationsServiceError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<Notification>, NotificationsServiceError>;
}

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, NotificationsServiceError>;
}

/// Source of fan-out recipients.
pub trait RecipientRepository: Send + Sync {
    /// Users with `role` and notifications enabled, excluding `exclude`, each
    /// with their registered tokens. Users without tokens may be omitted.
    async fn eligible_recipients(
        &self,
        role: UserRole,
        exclude: Uuid,
    ) -> Result<Vec<Recipient>, NotificationsServiceError>;
}

/// Push delivery provider.
pub trait PushProvider: Send + Sync {
    /// Send `message` to every token. Returns one result per token, in order.
    ///
    /// Per-token failures are `Ok` results; `Err` means the call as a whole failed.
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<Vec<SendResult>, NotificationsServiceError>;
}

pub trait DeliveryLogRepository: Send + Sync {
    /// Upsert every log and delete every stale token in one transaction.
    async fn commit_fanout(
        &self,
        logs: &[DeliveryLog],
        stale_tokens: &[StaleToken],
    ) -> Result<(), NotificationsServiceError>;

    async fn list_for_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Vec<DeliveryLog>, NotificationsServiceError>;
}
