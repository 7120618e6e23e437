//! Database repositories.

pub mod category;
pub mod comment;
pub mod officer_report;
pub mod report;
pub mod unit_work;
pub mod user;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use officer_report::OfficerReportRepository;
pub use report::{ReportCoordinate, ReportFilter, ReportRepository};
pub use unit_work::{CascadeSummary, UnitWorkRepository};
pub use user::UserRepository;

use lapor_common::AppError;
use sea_orm::{ActiveValue, DbErr, SqlErr, Value};

/// Value of a column that must be present on an active model.
pub(crate) fn required<V>(value: &ActiveValue<V>, column: &str) -> Result<V, AppError>
where
    V: Clone + Into<Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Ok(v.clone()),
        ActiveValue::NotSet => Err(AppError::Internal(format!("{column} is not set"))),
    }
}

/// Map constraint violations to client errors; anything else is a database error.
pub(crate) fn constraint_error(
    err: DbErr,
    on_unique: impl FnOnce() -> AppError,
    on_foreign_key: impl FnOnce() -> AppError,
) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_unique(),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => on_foreign_key(),
        _ => AppError::Database(err.to_string()),
    }
}
