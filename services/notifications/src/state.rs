use canteen_domain::user::UserRole;
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

use crate::domain::types::Notification;
use crate::infra::db::{
    DbDeliveryLogRepository, DbNotificationRepository, DbRecipientRepository, DbUserRepository,
};
use crate::infra::fcm::FcmPushProvider;
use crate::usecase::fanout::FanoutUseCase;

/// Fan-out settings read once from configuration.
#[derive(Clone, Copy, Debug)]
pub struct FanoutSettings {
    pub target_role: UserRole,
    pub batch_size: usize,
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub push: FcmPushProvider,
    pub fanout: FanoutSettings,
}

pub type DbFanoutUseCase =
    FanoutUseCase<DbRecipientRepository, FcmPushProvider, DbDeliveryLogRepository>;

impl AppState {
    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn delivery_log_repo(&self) -> DbDeliveryLogRepository {
        DbDeliveryLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn fanout_usecase(&self) -> DbFanoutUseCase {
        FanoutUseCase {
            recipients: DbRecipientRepository {
                db: self.db.clone(),
            },
            provider: self.push.clone(),
            logs: self.delivery_log_repo(),
            target_role: self.fanout.target_role,
            batch_size: self.fanout.batch_size,
        }
    }

    /// Run the fan-out for a freshly created notification in the background.
    /// Failures are logged; an admin can re-run it through the redeliver route.
    pub fn spawn_fanout(&self, notification: Notification) -> JoinHandle<()> {
        let usecase = self.fanout_usecase();
        tokio::spawn(async move {
            if let Err(e) = usecase.execute(&notification).await {
                tracing::error!(
                    notification_id = %notification.id,
                    error = ?e,
                    "notification fan-out failed"
                );
            }
        })
    }
}
