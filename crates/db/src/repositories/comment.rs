//! Comment repository.

use std::sync::Arc;

use super::{constraint_error, required};
use crate::entities::{Comment, Report, comment, report};
use lapor_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Touch the report and insert the comment in one transaction.
    ///
    /// Fails with `NotFound` when the report does not exist. The report row
    /// is updated first so it stays locked until the comment is stored.
    pub async fn create_for_report(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        let report_id = required(&model.report_id, "comment.report_id")?;
        let created_at = required(&model.created_at, "comment.created_at")?;
        let missing = || AppError::NotFound(format!("report {report_id}"));

        let txn = self.db.begin().await?;

        let touched = Report::update_many()
            .col_expr(report::Column::UpdatedAt, Expr::value(created_at))
            .filter(report::Column::Id.eq(report_id.as_str()))
            .exec(&txn)
            .await?;

        if touched.rows_affected == 0 {
            txn.rollback().await?;
            return Err(missing());
        }

        let comment = match model.insert(&txn).await {
            Ok(comment) => comment,
            Err(e) => {
                txn.rollback().await?;
                return Err(constraint_error(
                    e,
                    || AppError::Conflict("comment already exists".to_string()),
                    missing,
                ));
            }
        };

        txn.commit().await?;
        Ok(comment)
    }

    /// Comments of one report, oldest first.
    pub async fn find_by_report(&self, report_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ReportId.eq(report_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments of several reports, oldest first.
    pub async fn find_by_reports(&self, report_ids: &[String]) -> AppResult<Vec<comment::Model>> {
        if report_ids.is_empty() {
            return Ok(vec![]);
        }

        Comment::find()
            .filter(comment::Column::ReportId.is_in(report_ids.to_vec()))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_comment(id: &str, report_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            name: "Siti".to_string(),
            message: "Masih belum diperbaiki".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn active(model: &comment::Model) -> comment::ActiveModel {
        comment::ActiveModel {
            id: Set(model.id.clone()),
            report_id: Set(model.report_id.clone()),
            name: Set(model.name.clone()),
            message: Set(model.message.clone()),
            created_at: Set(model.created_at),
        }
    }

    #[tokio::test]
    async fn test_create_for_report_missing_report() {
        let comment = create_test_comment("cm1", "r404");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let err = repo.create_for_report(active(&comment)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_for_report() {
        let comment = create_test_comment("cm1", "r1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let created = repo.create_for_report(active(&comment)).await.unwrap();

        assert_eq!(created.id, "cm1");
        assert_eq!(created.name, "Siti");
    }

    #[tokio::test]
    async fn test_find_by_reports_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = CommentRepository::new(db);

        assert!(repo.find_by_reports(&[]).await.unwrap().is_empty());
    }
}
