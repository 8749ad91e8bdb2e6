use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Breaks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Breaks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Breaks::Name).string().not_null())
                    .col(
                        ColumnDef::new(Breaks::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Breaks::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Breaks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Breaks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Breaks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Breaks {
    Table,
    Id,
    Name,
    StartTime,
    EndTime,
    CreatedAt,
    UpdatedAt,
}
