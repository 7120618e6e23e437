//! Officer report repository.

use std::sync::Arc;

use crate::entities::{OfficerReport, officer_report};
use lapor_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Officer report repository for database operations.
///
/// Records are only written by [`super::ReportRepository::complete`].
#[derive(Clone)]
pub struct OfficerReportRepository {
    db: Arc<DatabaseConnection>,
}

impl OfficerReportRepository {
    /// Create a new officer report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an officer report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<officer_report::Model>> {
        OfficerReport::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find officer reports by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<officer_report::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        OfficerReport::find()
            .filter(officer_report::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_id_found() {
        let record = officer_report::Model {
            id: "or1".to_string(),
            report_id: "r1".to_string(),
            message: "Lubang sudah ditambal".to_string(),
            image_report: serde_json::json!(["after.jpg"]),
            officer_id: "o1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[record]])
                .into_connection(),
        );

        let repo = OfficerReportRepository::new(db);
        let found = repo.find_by_id("or1").await.unwrap().unwrap();

        assert_eq!(found.images(), vec!["after.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_find_by_ids_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = OfficerReportRepository::new(db);

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }
}
