use sea_orm::entity::prelude::*;

/// Broadcast notification. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_role: i16,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification_delivery_logs::Entity")]
    DeliveryLogs,
}

impl Related<super::notification_delivery_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
