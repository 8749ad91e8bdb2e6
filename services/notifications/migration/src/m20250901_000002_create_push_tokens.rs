use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PushTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PushTokens::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PushTokens::UserId).uuid().not_null())
                    .col(ColumnDef::new(PushTokens::Token).string().not_null())
                    .col(
                        ColumnDef::new(PushTokens::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PushTokens::Table, PushTokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_push_tokens_user_id_token")
                    .table(PushTokens::Table)
                    .col(PushTokens::UserId)
                    .col(PushTokens::Token)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PushTokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PushTokens {
    Table,
    Id,
    UserId,
    Token,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
