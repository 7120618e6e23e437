//! Create user and user_token tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Guid).string_len(36).not_null())
                    .col(ColumnDef::new(User::UserNumber).big_integer().not_null())
                    .col(ColumnDef::new(User::Name).string_len(64).not_null())
                    .col(ColumnDef::new(User::Email).string_len(64).not_null())
                    .col(ColumnDef::new(User::Password).string_len(255).not_null())
                    .col(
                        ColumnDef::new(User::Role)
                            .string_len(16)
                            .not_null()
                            .default("user"),
                    )
                    .col(ColumnDef::new(User::Image).string_len(1024))
                    .col(ColumnDef::new(User::UnitWorkId).string_len(32))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email (sign-in key)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_guid")
                    .table(User::Table)
                    .col(User::Guid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_user_number")
                    .table(User::Table)
                    .col(User::UserNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: unit_work_id (for unit work cascade)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_unit_work_id")
                    .table(User::Table)
                    .col(User::UnitWorkId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserToken::Token)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserToken::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(UserToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_token_user")
                            .from(UserToken::Table, UserToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_token_user_id")
                    .table(UserToken::Table)
                    .col(UserToken::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserToken::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Guid,
    UserNumber,
    Name,
    Email,
    Password,
    Role,
    Image,
    UnitWorkId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserToken {
    Table,
    Token,
    UserId,
    CreatedAt,
}
