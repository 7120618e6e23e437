//! Report repository.

use std::sync::Arc;

use super::required;
use crate::entities::{
    Comment, OfficerReport, Report, comment, officer_report,
    report::{self, ReportStatus},
};
use lapor_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::Serialize;

/// Filter for paginated report listings.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub reporter_id: Option<String>,
    pub officer_id: Option<String>,
    pub unit_work_id: Option<String>,
    pub status: Option<ReportStatus>,
    /// Case-insensitive substring of the title.
    pub title_query: Option<String>,
}

impl ReportFilter {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(id) = &self.reporter_id {
            cond = cond.add(report::Column::ReporterId.eq(id.as_str()));
        }
        if let Some(id) = &self.officer_id {
            cond = cond.add(report::Column::OfficerId.eq(id.as_str()));
        }
        if let Some(id) = &self.unit_work_id {
            cond = cond.add(report::Column::UnitWorkId.eq(id.as_str()));
        }
        if let Some(status) = self.status {
            cond = cond.add(report::Column::Status.eq(status));
        }
        if let Some(q) = self.title_query.as_deref().filter(|q| !q.is_empty()) {
            cond = cond.add(
                Expr::expr(Func::lower(Expr::col(report::Column::Title))).like(contains(q)),
            );
        }

        cond
    }
}

/// `LIKE` pattern matching `q` anywhere, with wildcards in `q` taken literally.
fn contains(q: &str) -> LikeExpr {
    LikeExpr::new(contains_pattern(q)).escape('\\')
}

fn contains_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Map point of a report that has been acted upon.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ReportCoordinate {
    pub title: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("report {id}")))
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every report, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<report::Model>> {
        Report::find()
            .order_by_desc(report::Column::CreatedAt)
            .order_by_desc(report::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of reports matching `filter`, newest first, with the total
    /// number of matches.
    pub async fn find_paginated(
        &self,
        filter: &ReportFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<report::Model>, u64)> {
        let count = Report::find()
            .filter(filter.condition())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = Report::find()
            .filter(filter.condition())
            .order_by_desc(report::Column::CreatedAt)
            .order_by_desc(report::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, count))
    }

    /// Route a report to a unit work and mark it as processing.
    ///
    /// The update only applies while the report is waiting or processing,
    /// so a report closed in the meantime is never reopened.
    pub async fn assign(&self, id: &str, unit_work_id: &str) -> AppResult<report::Model> {
        let changes = report::ActiveModel {
            unit_work_id: Set(Some(unit_work_id.to_string())),
            status: Set(ReportStatus::Processing),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let result = Report::update_many()
            .set(changes)
            .filter(report::Column::Id.eq(id))
            .filter(
                report::Column::Status.is_in([ReportStatus::Waiting, ReportStatus::Processing]),
            )
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "report {id} can no longer be assigned"
            )));
        }

        self.get_by_id(id).await
    }

    /// Store the officer's resolution record and close the report, in one
    /// transaction.
    ///
    /// The report is closed only if it is still processing; otherwise
    /// nothing is written and the result is `Conflict`.
    pub async fn complete(
        &self,
        id: &str,
        resolution: officer_report::ActiveModel,
    ) -> AppResult<(report::Model, officer_report::Model)> {
        let resolution_id = required(&resolution.id, "officer_report.id")?;
        let officer_id = required(&resolution.officer_id, "officer_report.officer_id")?;
        let closed_at = required(&resolution.created_at, "officer_report.created_at")?;

        let txn = self.db.begin().await?;

        let changes = report::ActiveModel {
            status: Set(ReportStatus::Done),
            officer_report_id: Set(Some(resolution_id)),
            officer_id: Set(Some(officer_id)),
            updated_at: Set(closed_at),
            ..Default::default()
        };
        let closed = Report::update_many()
            .set(changes)
            .filter(report::Column::Id.eq(id))
            .filter(report::Column::Status.eq(ReportStatus::Processing))
            .exec(&txn)
            .await?;

        if closed.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::Conflict(format!(
                "report {id} is no longer {}",
                ReportStatus::Processing.label()
            )));
        }

        let resolution = resolution.insert(&txn).await?;
        let report = Report::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("report {id}")))?;

        txn.commit().await?;
        Ok((report, resolution))
    }

    /// Delete a report together with its comments and officer reports.
    pub async fn delete_with_owned(&self, id: &str) -> AppResult<()> {
        let txn = self.db.begin().await?;

        Comment::delete_many()
            .filter(comment::Column::ReportId.eq(id))
            .exec(&txn)
            .await?;

        OfficerReport::delete_many()
            .filter(officer_report::Column::ReportId.eq(id))
            .exec(&txn)
            .await?;

        let result = Report::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::NotFound(format!("report {id}")));
        }

        txn.commit().await?;
        Ok(())
    }

    /// Total number of reports.
    pub async fn count(&self) -> AppResult<u64> {
        Report::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Report counts grouped by status. Statuses without reports are absent.
    pub async fn count_by_status(&self) -> AppResult<Vec<(ReportStatus, u64)>> {
        let rows: Vec<(String, i64)> = Report::find()
            .select_only()
            .column(report::Column::Status)
            .column_as(report::Column::Id.count(), "total")
            .group_by(report::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut counts = Vec::with_capacity(rows.len());
        for (label, total) in rows {
            let status = ReportStatus::from_label(&label)
                .ok_or_else(|| AppError::Internal(format!("unknown report status {label:?}")))?;
            counts.push((status, u64::try_from(total).unwrap_or(0)));
        }
        Ok(counts)
    }

    /// Coordinates of every report that is no longer waiting.
    pub async fn find_coordinates(&self) -> AppResult<Vec<ReportCoordinate>> {
        Report::find()
            .select_only()
            .columns([
                report::Column::Title,
                report::Column::Address,
                report::Column::Latitude,
                report::Column::Longitude,
            ])
            .filter(report::Column::Status.ne(ReportStatus::Waiting))
            .order_by_desc(report::Column::CreatedAt)
            .into_model::<ReportCoordinate>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
