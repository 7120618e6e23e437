//! Business logic services.

#![allow(missing_docs)]

pub mod category;
pub mod comment;
pub mod dashboard;
pub mod enrichment;
pub mod report;
pub mod unit_work;
pub mod user;

pub use category::{CategoryService, CreateCategoryInput};
pub use comment::{CommentService, CreateCommentInput};
pub use dashboard::{DashboardService, StatusSummary};
pub use enrichment::{
    CategoryRef, CommentView, NamedRef, OfficerReportRef, Reference, ReportDetail, ReportEnricher,
    UNKNOWN_NAME,
};
pub use report::{
    AssignReportInput, CompleteReportInput, CreateReportInput, Page, ReportListQuery,
    ReportService,
};
pub use unit_work::{CreateUnitWorkInput, UnitWorkService};
pub use user::{AuthSession, CreateStaffInput, SigninInput, SignupInput, UserService};

use lapor_common::{AppError, AppResult};
use lapor_db::entities::user as user_entity;

/// Reject callers that are not admin or superadmin.
pub fn require_admin(caller: &user_entity::Model) -> AppResult<()> {
    if caller.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin role required".to_string()))
    }
}
