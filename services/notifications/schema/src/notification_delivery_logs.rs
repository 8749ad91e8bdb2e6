use sea_orm::entity::prelude::*;

/// Per-recipient delivery outcome of one notification.
///
/// `id` is `"{notification_id}_{user_id}"`, so re-running a fan-out merges into
/// the same row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_delivery_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub success_count: i32,
    pub failure_count: i32,
    /// JSON array of at most five error codes.
    pub errors: Json,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notifications::Entity",
        from = "Column::NotificationId",
        to = "super::notifications::Column::Id"
    )]
    Notification,
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
