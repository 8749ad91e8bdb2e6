use serde::Deserialize;

use canteen_core::config::Config;
use canteen_domain::user::UserRole;

use crate::domain::types::MULTICAST_BATCH_LIMIT;

/// Notifications service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct NotificationsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3122). Env var: `NOTIFICATIONS_PORT`.
    #[serde(default = "default_port")]
    pub notifications_port: u16,
    /// Firebase project that owns the registered device tokens.
    pub fcm_project_id: String,
    /// OAuth2 bearer token for the FCM HTTP v1 API.
    pub fcm_access_token: String,
    #[serde(default = "default_fcm_endpoint")]
    pub fcm_endpoint: String,
    /// Tokens per multicast call. Env var: `FCM_BATCH_SIZE`.
    #[serde(default = "default_batch_size")]
    pub fcm_batch_size: usize,
    /// Concurrent HTTP sends inside one multicast call.
    #[serde(default = "default_max_in_flight")]
    pub fcm_max_in_flight: usize,
    /// Role that broadcasts are delivered to. Env var: `NOTIFY_TARGET_ROLE`.
    #[serde(default = "default_target_role")]
    pub notify_target_role: UserRole,
}

impl Config for NotificationsConfig {}

impl NotificationsConfig {
    /// `FCM_BATCH_SIZE` clamped to what one provider call accepts.
    pub fn batch_size(&self) -> usize {
        self.fcm_batch_size.clamp(1, MULTICAST_BATCH_LIMIT)
    }
}

fn default_port() -> u16 {
    3122
}

fn default_fcm_endpoint() -> String {
    "https://fcm.googleapis.com".to_owned()
}

fn default_batch_size() -> usize {
    MULTICAST_BATCH_LIMIT
}

fn default_max_in_flight() -> usize {
    32
}

fn default_target_role() -> UserRole {
    UserRole::Member
}
