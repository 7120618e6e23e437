//! Comment service.

use lapor_common::{AppResult, IdGenerator};
use lapor_db::{
    entities::{comment, user},
    repositories::{CommentRepository, ReportRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

/// Input for commenting on a report.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 255))]
    pub id_report: String,

    #[validate(length(min = 1))]
    pub message: String,
}

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    report_repo: ReportRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, report_repo: ReportRepository) -> Self {
        Self {
            comment_repo,
            report_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a report, signed with the author's current name.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let report = self.report_repo.get_by_id(&input.id_report).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report.id),
            name: Set(author.name.clone()),
            message: Set(input.message),
            created_at: Set(chrono::Utc::now().into()),
        };

        let comment = self.comment_repo.create_for_report(model).await?;
        debug!(comment_id = %comment.id, report_id = %comment.report_id, "Comment added");
        Ok(comment)
    }

    /// Comments of a report, oldest first.
    pub async fn list_for_report(&self, report_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_report(report_id).await
    }
}
