use std::collections::BTreeMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use canteen_domain::pagination::PageRequest;
use canteen_domain::user::UserRole;
use canteen_notifications_schema::{notification_delivery_logs, notifications, push_tokens, users};

use crate::domain::repository::{
    DeliveryLogRepository, NotificationRepository, RecipientRepository, UserRepository,
};
use crate::domain::types::{DeliveryLog, Notification, Recipient, StaleToken, UserProfile};
use crate::error::NotificationsServiceError;

/// Rows per multi-row upsert, well under the Postgres bind-parameter limit.
const UPSERT_CHUNK: usize = 1000;

fn role_from_column(role: i16) -> Result<UserRole, NotificationsServiceError> {
    u8::try_from(role)
        .ok()
        .and_then(UserRole::from_u8)
        .ok_or_else(|| anyhow::anyhow!("unknown role value {role}").into())
}

fn role_to_column(role: UserRole) -> i16 {
    i16::from(role.as_u8())
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), NotificationsServiceError> {
        notifications::ActiveModel {
            id: Set(notification.id),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            sender_id: Set(notification.sender_id),
            sender_name: Set(notification.sender_name.clone()),
            sender_role: Set(role_to_column(notification.sender_role)),
            created_at: Set(notification.created_at),
        }
        .insert(&self.db)
        .await
        .context("create notification")?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Notification>, NotificationsServiceError> {
        let model = notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find notification by id")?;
        model.map(notification_from_model).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Notification>, NotificationsServiceError> {
        let models = notifications::Entity::find()
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list notifications")?;
        models.into_iter().map(notification_from_model).collect()
    }
}

fn notification_from_model(
    model: notifications::Model,
) -> Result<Notification, NotificationsServiceError> {
    Ok(Notification {
        id: model.id,
        title: model.title,
        message: model.message,
        sender_id: model.sender_id,
        sender_name: model.sender_name,
        sender_role: role_from_column(model.sender_role)?,
        created_at: model.created_at,
    })
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, NotificationsServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?
        else {
            return Ok(None);
        };
        Ok(Some(UserProfile {
            id: model.id,
            name: model.name,
            role: role_from_column(model.role)?,
        }))
    }
}

// ── Recipient repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipientRepository {
    pub db: DatabaseConnection,
}

impl RecipientRepository for DbRecipientRepository {
    async fn eligible_recipients(
        &self,
        role: UserRole,
        exclude: Uuid,
    ) -> Result<Vec<Recipient>, NotificationsServiceError> {
        let tokens = push_tokens::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                push_tokens::Relation::User.def(),
            )
            .filter(users::Column::Role.eq(role_to_column(role)))
            .filter(users::Column::NotificationsEnabled.eq(true))
            .filter(users::Column::Id.ne(exclude))
            .order_by_asc(push_tokens::Column::UserId)
            .order_by_asc(push_tokens::Column::Id)
            .all(&self.db)
            .await
            .context("list eligible push tokens")?;

        let mut by_user: BTreeMap<Uuid, Vec<String>> = BTreeMap::new();
        for token in tokens {
            by_user.entry(token.user_id).or_default().push(token.token);
        }
        Ok(by_user
            .into_iter()
            .map(|(user_id, tokens)| Recipient { user_id, tokens })
            .collect())
    }
}

// ── Delivery log repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeliveryLogRepository {
    pub db: DatabaseConnection,
}

impl DeliveryLogRepository for DbDeliveryLogRepository {
    async fn commit_fanout(
        &self,
        logs: &[DeliveryLog],
        stale_tokens: &[StaleToken],
    ) -> Result<(), NotificationsServiceError> {
        let models: Vec<notification_delivery_logs::ActiveModel> =
            logs.iter().map(log_to_active_model).collect();
        let stale_tokens = stale_tokens.to_vec();

        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    for chunk in models.chunks(UPSERT_CHUNK) {
                        notification_delivery_logs::Entity::insert_many(chunk.to_vec())
                            .on_conflict(
                                OnConflict::column(notification_delivery_logs::Column::Id)
                                    .update_columns([
                                        notification_delivery_logs::Column::SuccessCount,
                                        notification_delivery_logs::Column::FailureCount,
                                        notification_delivery_logs::Column::Errors,
                                        notification_delivery_logs::Column::UpdatedAt,
                                    ])
                                    .to_owned(),
                            )
                            .exec_without_returning(txn)
                            .await?;
                    }

                    for StaleToken { user_id, token } in stale_tokens {
                        push_tokens::Entity::delete_many()
                            .filter(push_tokens::Column::UserId.eq(user_id))
                            .filter(push_tokens::Column::Token.eq(token))
                            .exec(txn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("commit notification fan-out")?;
        Ok(())
    }

    async fn list_for_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Vec<DeliveryLog>, NotificationsServiceError> {
        let models = notification_delivery_logs::Entity::find()
            .filter(notification_delivery_logs::Column::NotificationId.eq(notification_id))
            .order_by_asc(notification_delivery_logs::Column::UserId)
            .all(&self.db)
            .await
            .context("list delivery logs")?;
        models.into_iter().map(log_from_model).collect()
    }
}

fn log_to_active_model(log: &DeliveryLog) -> notification_delivery_logs::ActiveModel {
    notification_delivery_logs::ActiveModel {
        id: Set(log.id()),
        notification_id: Set(log.notification_id),
        user_id: Set(log.user_id),
        success_count: Set(i32::try_from(log.success_count).unwrap_or(i32::MAX)),
        failure_count: Set(i32::try_from(log.failure_count).unwrap_or(i32::MAX)),
        errors: Set(serde_json::json!(log.errors)),
        updated_at: Set(log.updated_at),
    }
}

fn log_from_model(
    model: notification_delivery_logs::Model,
) -> Result<DeliveryLog, NotificationsServiceError> {
    let errors: Vec<String> =
        serde_json::from_value(model.errors).context("decode delivery log errors")?;
    Ok(DeliveryLog {
        notification_id: model.notification_id,
        user_id: model.user_id,
        success_count: u32::try_from(model.success_count).context("decode success count")?,
        failure_count: u32::try_from(model.failure_count).context("decode failure count")?,
        errors,
        updated_at: model.updated_at,
    })
}
