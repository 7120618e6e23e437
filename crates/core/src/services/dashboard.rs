//! Dashboard aggregation service.

use lapor_common::AppResult;
use lapor_db::{
    entities::report::ReportStatus,
    repositories::{ReportCoordinate, ReportRepository},
};
use serde::Serialize;

/// Report counts per status. Every key is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    #[serde(rename = "Menunggu")]
    pub waiting: u64,
    #[serde(rename = "Diproses")]
    pub processing: u64,
    #[serde(rename = "Selesai")]
    pub done: u64,
    #[serde(rename = "Ditolak")]
    pub rejected: u64,
}

impl StatusSummary {
    /// Build from grouped counts; statuses not listed stay at zero.
    #[must_use]
    pub fn from_counts(counts: &[(ReportStatus, u64)]) -> Self {
        let mut summary = Self::default();
        for &(status, count) in counts {
            *summary.slot(status) += count;
        }
        summary
    }

    fn slot(&mut self, status: ReportStatus) -> &mut u64 {
        match status {
            ReportStatus::Waiting => &mut self.waiting,
            ReportStatus::Processing => &mut self.processing,
            ReportStatus::Done => &mut self.done,
            ReportStatus::Rejected => &mut self.rejected,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.waiting + self.processing + self.done + self.rejected
    }
}

/// Dashboard service.
#[derive(Clone)]
pub struct DashboardService {
    report_repo: ReportRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository) -> Self {
        Self { report_repo }
    }

    /// Count reports per status with one grouped query.
    pub async fn summary(&self) -> AppResult<StatusSummary> {
        let counts = self.report_repo.count_by_status().await?;
        Ok(StatusSummary::from_counts(&counts))
    }

    /// Map points for reports that have been acted upon.
    pub async fn coordinates(&self) -> AppResult<Vec<ReportCoordinate>> {
        self.report_repo.find_coordinates().await
    }
}
