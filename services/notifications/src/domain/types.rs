use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use canteen_domain::user::UserRole;

/// Most tokens one provider multicast call accepts.
pub const MULTICAST_BATCH_LIMIT: usize = 500;

/// Error codes kept per recipient in a delivery log.
pub const MAX_RECORDED_ERRORS: usize = 5;

pub const MAX_TITLE_LEN: usize = 120;
pub const MAX_MESSAGE_LEN: usize = 2000;

/// FCM rejects messages whose notification and data payload exceed this.
pub const MAX_PAYLOAD_BYTES: usize = 4096;

/// Provider error codes that mean the token will never work again.
pub const TOKEN_NOT_REGISTERED: &str = "messaging/registration-token-not-registered";
pub const INVALID_REGISTRATION_TOKEN: &str = "messaging/invalid-registration-token";

/// Rejected request that does not implicate the token, e.g. an oversized payload.
pub const INVALID_ARGUMENT: &str = "messaging/invalid-argument";

pub fn is_permanently_invalid(code: &str) -> bool {
    code == TOKEN_NOT_REGISTERED || code == INVALID_REGISTRATION_TOKEN
}

/// Broadcast notification record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

/// Eligible user and every device token registered for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: Uuid,
    pub tokens: Vec<String>,
}

/// Payload sent identically to every token of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    pub fn for_notification(notification: &Notification) -> Self {
        let data = BTreeMap::from([
            ("notificationId".to_owned(), notification.id.to_string()),
            ("senderId".to_owned(), notification.sender_id.to_string()),
        ]);
        Self {
            title: notification.title.clone(),
            body: notification.message.clone(),
            data,
        }
    }

    /// UTF-8 size of the title, body and data entries.
    pub fn payload_bytes(&self) -> usize {
        self.title.len()
            + self.body.len()
            + self
                .data
                .iter()
                .map(|(key, value)| key.len() + value.len())
                .sum::<usize>()
    }
}

/// Per-token result of a multicast call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Delivered,
    Failed { code: String },
}

/// Running per-recipient outcome of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryTally {
    pub success_count: u32,
    pub failure_count: u32,
    /// Most recent error codes, oldest first.
    pub errors: VecDeque<String>,
}

impl DeliveryTally {
    pub fn record(&mut self, result: &SendResult) {
        match result {
            SendResult::Delivered => self.success_count += 1,
            SendResult::Failed { code } => {
                self.failure_count += 1;
                if self.errors.len() == MAX_RECORDED_ERRORS {
                    self.errors.pop_front();
                }
                self.errors.push_back(code.clone());
            }
        }
    }
}

/// Persisted delivery outcome for one (notification, recipient) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryLog {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub success_count: u32,
    pub failure_count: u32,
    pub errors: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl DeliveryLog {
    /// Deterministic key so that repeated runs merge into one log.
    pub fn key(notification_id: Uuid, user_id: Uuid) -> String {
        format!("{notification_id}_{user_id}")
    }

    pub fn id(&self) -> String {
        Self::key(self.notification_id, self.user_id)
    }
}

/// Exact token to delete from its owner's token list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StaleToken {
    pub user_id: Uuid,
    pub token: String,
}

/// Summary of one fan-out run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub notification_id: Uuid,
    /// Users that received at least one send attempt.
    pub recipients: usize,
    pub tokens: usize,
    pub batches: usize,
    pub delivered: u32,
    pub failed: u32,
    pub pruned: usize,
}
