//! Create unit_work table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnitWork::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UnitWork::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(UnitWork::Name).string_len(255).not_null())
                    .col(ColumnDef::new(UnitWork::Image).json().not_null())
                    .col(ColumnDef::new(UnitWork::Detail).string_len(255).not_null())
                    .col(
                        ColumnDef::new(UnitWork::CreatedAt)
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
            .drop_table(Table::drop().table(UnitWork::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UnitWork {
    Table,
    Id,
    Name,
    Image,
    Detail,
    CreatedAt,
}
