//! Unit work repository.

use std::sync::Arc;

use crate::entities::{
    Comment, OfficerReport, Report, UnitWork, User, UserToken, comment, officer_report, report,
    unit_work, user, user_token,
};
use lapor_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

/// Rows removed by a unit work deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub users: u64,
    pub reports: u64,
}

/// Unit work repository for database operations.
#[derive(Clone)]
pub struct UnitWorkRepository {
    db: Arc<DatabaseConnection>,
}

impl UnitWorkRepository {
    /// Create a new unit work repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a unit work by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<unit_work::Model>> {
        UnitWork::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a unit work by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<unit_work::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unit work {id}")))
    }

    /// Find unit works by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<unit_work::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        UnitWork::find()
            .filter(unit_work::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All unit works, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<unit_work::Model>> {
        UnitWork::find()
            .order_by_desc(unit_work::Column::CreatedAt)
            .order_by_desc(unit_work::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new unit work.
    pub async fn create(&self, model: unit_work::ActiveModel) -> AppResult<unit_work::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a unit work with every user and report that references it.
    ///
    /// Users lose their tokens; reports lose their comments and officer
    /// reports. Everything runs in one transaction.
    pub async fn delete_cascade(&self, id: &str) -> AppResult<CascadeSummary> {
        let txn = self.db.begin().await?;

        if UnitWork::find_by_id(id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Err(AppError::NotFound(format!("unit work {id}")));
        }

        let user_ids: Vec<String> = User::find()
            .select_only()
            .column(user::Column::Id)
            .filter(user::Column::UnitWorkId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let report_ids: Vec<String> = Report::find()
            .select_only()
            .column(report::Column::Id)
            .filter(report::Column::UnitWorkId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !user_ids.is_empty() {
            UserToken::delete_many()
                .filter(user_token::Column::UserId.is_in(user_ids.clone()))
                .exec(&txn)
                .await?;
        }
        let users = User::delete_many()
            .filter(user::Column::UnitWorkId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        if !report_ids.is_empty() {
            Comment::delete_many()
                .filter(comment::Column::ReportId.is_in(report_ids.clone()))
                .exec(&txn)
                .await?;
            OfficerReport::delete_many()
                .filter(officer_report::Column::ReportId.is_in(report_ids))
                .exec(&txn)
                .await?;
        }
        let reports = Report::delete_many()
            .filter(report::Column::UnitWorkId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        UnitWork::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(unit_work_id = %id, users, reports, "Deleted unit work");
        Ok(CascadeSummary { users, reports })
    }
}
