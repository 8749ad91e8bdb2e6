use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_push_tokens;
mod m20250901_000003_create_notifications;
mod m20250901_000004_create_notification_delivery_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_push_tokens::Migration),
            Box::new(m20250901_000003_create_notifications::Migration),
            Box::new(m20250901_000004_create_notification_delivery_logs::Migration),
        ]
    }
}
