use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BreakEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BreakEvents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BreakEvents::BreakId).uuid().not_null())
                    .col(ColumnDef::new(BreakEvents::BreakName).string().not_null())
                    .col(ColumnDef::new(BreakEvents::Kind).string().not_null())
                    .col(
                        ColumnDef::new(BreakEvents::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Audit queries read a day at a time.
        manager
            .create_index(
                Index::create()
                    .table(BreakEvents::Table)
                    .col(BreakEvents::OccurredAt)
                    .name("idx_break_events_occurred_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BreakEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BreakEvents {
    Table,
    Id,
    BreakId,
    BreakName,
    Kind,
    OccurredAt,
}
