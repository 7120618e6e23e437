//! Create report, officer_report and comment tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Category, unit work and user references are soft: reads fall back
        // to "Unknown" when the target is gone.
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Report::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Report::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Report::Description).text().not_null())
                    .col(ColumnDef::new(Report::Address).text().not_null())
                    .col(ColumnDef::new(Report::Latitude).string_len(64).not_null())
                    .col(ColumnDef::new(Report::Longitude).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Report::Status)
                            .string_len(16)
                            .not_null()
                            .default("Menunggu"),
                    )
                    .col(ColumnDef::new(Report::ImageReport).json().not_null())
                    .col(ColumnDef::new(Report::CategoryId).string_len(32).not_null())
                    .col(ColumnDef::new(Report::ReporterId).string_len(32).not_null())
                    .col(ColumnDef::new(Report::UnitWorkId).string_len(32))
                    .col(ColumnDef::new(Report::OfficerReportId).string_len(32))
                    .col(ColumnDef::new(Report::OfficerId).string_len(32))
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Report::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_report_status", Report::Status),
            ("idx_report_category_id", Report::CategoryId),
            ("idx_report_reporter_id", Report::ReporterId),
            ("idx_report_unit_work_id", Report::UnitWorkId),
            ("idx_report_officer_id", Report::OfficerId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Report::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // Index: created_at DESC (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_created_at")
                    .table(Report::Table)
                    .col((Report::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OfficerReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfficerReport::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OfficerReport::ReportId).string_len(32).not_null())
                    .col(ColumnDef::new(OfficerReport::Message).text().not_null())
                    .col(ColumnDef::new(OfficerReport::ImageReport).json().not_null())
                    .col(ColumnDef::new(OfficerReport::OfficerId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(OfficerReport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_officer_report_report")
                            .from(OfficerReport::Table, OfficerReport::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_officer_report_report_id")
                    .table(OfficerReport::Table)
                    .col(OfficerReport::ReportId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comment::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Comment::ReportId).string_len(32).not_null())
                    .col(ColumnDef::new(Comment::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Comment::Message).text().not_null())
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_report")
                            .from(Comment::Table, Comment::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_report_id")
                    .table(Comment::Table)
                    .col(Comment::ReportId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OfficerReport::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Report {
    Table,
    Id,
    Title,
    Description,
    Address,
    Latitude,
    Longitude,
    Status,
    ImageReport,
    CategoryId,
    ReporterId,
    UnitWorkId,
    OfficerReportId,
    OfficerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OfficerReport {
    Table,
    Id,
    ReportId,
    Message,
    ImageReport,
    OfficerId,
    CreatedAt,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
    ReportId,
    Name,
    Message,
    CreatedAt,
}
