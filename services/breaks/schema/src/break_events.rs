use sea_orm::entity::prelude::*;

/// Audit record of a break starting or ending, as observed by the status watcher.
///
/// `break_id` is not a foreign key: events outlive deleted breaks.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "break_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub break_id: Uuid,
    pub break_name: String,
    /// `break_started` or `break_ended`.
    pub kind: String,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
