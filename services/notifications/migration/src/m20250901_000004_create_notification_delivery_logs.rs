use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationDeliveryLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::NotificationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::SuccessCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::FailureCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::Errors)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationDeliveryLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                NotificationDeliveryLogs::Table,
                                NotificationDeliveryLogs::NotificationId,
                            )
                            .to(Notifications::Table, Notifications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_delivery_logs_notification_id")
                    .table(NotificationDeliveryLogs::Table)
                    .col(NotificationDeliveryLogs::NotificationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(NotificationDeliveryLogs::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum NotificationDeliveryLogs {
    Table,
    Id,
    NotificationId,
    UserId,
    SuccessCount,
    FailureCount,
    Errors,
    UpdatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
}
