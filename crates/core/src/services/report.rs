//! Report lifecycle service.
//!
//! Status machine: `Menunggu` (waiting) is initial. Assignment moves a
//! waiting or processing report to `Diproses`; officer completion moves a
//! processing report to `Selesai`. `Selesai` and `Ditolak` are terminal.

use lapor_common::{AppError, AppResult, FieldError, IdGenerator, is_valid_id};
use lapor_db::{
    entities::{
        image_json, officer_report,
        report::{self, ReportStatus},
        user::{self, UserRole},
    },
    repositories::{CategoryRepository, ReportFilter, ReportRepository, UnitWorkRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::enrichment::{ReportDetail, ReportEnricher};
use super::require_admin;

/// Page size when the client sends none.
pub const DEFAULT_PAGE_LIMIT: u64 = 8;

/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Input for creating a report.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateReportInput {
    #[validate(length(min = 5, max = 50))]
    pub title: String,

    #[validate(length(min = 5))]
    pub description: String,

    #[validate(length(min = 3))]
    pub address: String,

    #[validate(length(min = 1, max = 255))]
    pub latitude: String,

    #[validate(length(min = 1, max = 255))]
    pub longitude: String,

    pub image_report: Vec<String>,

    /// Category id.
    #[validate(length(min = 1))]
    pub category: String,
}

/// Input for routing a report to a unit work.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AssignReportInput {
    #[validate(length(min = 1, max = 255))]
    pub report_id: String,

    #[validate(length(min = 1, max = 255))]
    pub unit_work_id: String,
}

/// Input for an officer closing a report.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CompleteReportInput {
    #[validate(length(min = 1, max = 255))]
    pub id_report: String,

    #[validate(length(min = 1))]
    pub message: String,

    /// Evidence photos. At least one is required.
    #[serde(rename = "imageReport")]
    #[validate(length(min = 1))]
    pub image_report: Vec<String>,
}

/// Query string of the paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportListQuery {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    /// Title search.
    pub q: Option<String>,
    /// Status label; empty means any.
    pub status: Option<String>,
}

impl ReportListQuery {
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    #[must_use]
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    fn title_query(&self) -> Option<String> {
        self.q.clone().filter(|q| !q.trim().is_empty())
    }

    fn status(&self) -> AppResult<Option<ReportStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(label) => ReportStatus::from_label(label).map(Some).ok_or_else(|| {
                AppError::Validation(vec![FieldError::new(
                    "status",
                    "status",
                    "must be one of Menunggu, Diproses, Selesai, Ditolak",
                )])
            }),
        }
    }
}

/// A page of results with the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub items: Vec<T>,
}

/// Report lifecycle service.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    category_repo: CategoryRepository,
    unit_work_repo: UnitWorkRepository,
    enricher: ReportEnricher,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        category_repo: CategoryRepository,
        unit_work_repo: UnitWorkRepository,
        enricher: ReportEnricher,
    ) -> Self {
        Self {
            report_repo,
            category_repo,
            unit_work_repo,
            enricher,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new report. It starts out waiting.
    pub async fn create(
        &self,
        reporter: &user::Model,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        let category = self.category_repo.get_by_id(&input.category).await?;

        let now = chrono::Utc::now();
        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            address: Set(input.address),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            status: Set(ReportStatus::Waiting),
            image_report: Set(image_json(&input.image_report)),
            category_id: Set(category.id),
            reporter_id: Set(reporter.id.clone()),
            unit_work_id: Set(None),
            officer_report_id: Set(None),
            officer_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let report = self.report_repo.create(model).await?;
        info!(report_id = %report.id, reporter_id = %reporter.id, "Report created");
        Ok(report)
    }

    /// Route a report to a unit work. Admins only.
    ///
    /// Re-assigning a processing report is allowed and keeps it processing.
    /// The store re-checks the status, so a report closed concurrently
    /// stays closed and the caller gets `Conflict`.
    pub async fn assign(
        &self,
        caller: &user::Model,
        input: AssignReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;
        require_admin(caller)?;

        let report = self.report_repo.get_by_id(&input.report_id).await?;
        let unit_work = self.unit_work_repo.get_by_id(&input.unit_work_id).await?;

        if report.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "report is {} and can no longer be assigned",
                report.status.label()
            )));
        }

        let report = self.report_repo.assign(&report.id, &unit_work.id).await?;
        info!(report_id = %report.id, unit_work_id = %unit_work.id, "Report assigned");
        Ok(report)
    }

    /// Close a processing report with the officer's resolution record.
    ///
    /// Plain users are rejected before the report is looked at.
    pub async fn complete(
        &self,
        caller: &user::Model,
        input: CompleteReportInput,
    ) -> AppResult<(report::Model, officer_report::Model)> {
        if caller.role == UserRole::User {
            return Err(AppError::Forbidden(
                "only officers and admins can complete reports".to_string(),
            ));
        }
        input.validate()?;

        if !is_valid_id(&input.id_report) {
            return Err(AppError::NotFound(format!("report {}", input.id_report)));
        }
        let report = self.report_repo.get_by_id(&input.id_report).await?;

        if report.status != ReportStatus::Processing {
            return Err(AppError::Conflict(format!(
                "report is {}, only {} reports can be completed",
                report.status.label(),
                ReportStatus::Processing.label()
            )));
        }

        let resolution = officer_report::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report.id.clone()),
            message: Set(input.message),
            image_report: Set(image_json(&input.image_report)),
            officer_id: Set(caller.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let (report, resolution) = self.report_repo.complete(&report.id, resolution).await?;
        info!(report_id = %report.id, officer_id = %caller.id, "Report completed");
        Ok((report, resolution))
    }

    /// Delete a report. Admins may delete any report, users only their own.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        let report = self.report_repo.get_by_id(id).await?;

        if !caller.role.is_admin() && report.reporter_id != caller.id {
            return Err(AppError::Forbidden(
                "not allowed to delete this report".to_string(),
            ));
        }

        self.report_repo.delete_with_owned(id).await?;
        info!(report_id = %id, caller_id = %caller.id, "Report deleted");
        Ok(())
    }

    /// Get one enriched report.
    pub async fn get(&self, id: &str) -> AppResult<ReportDetail> {
        let report = self.report_repo.get_by_id(id).await?;
        self.enricher.enrich(report).await
    }

    /// Every report, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<ReportDetail>> {
        let reports = self.report_repo.find_all().await?;
        self.enricher.enrich_all(reports).await
    }

    /// Processing reports routed to a unit work.
    pub async fn list_by_unit_work(
        &self,
        unit_work_id: &str,
        query: &ReportListQuery,
    ) -> AppResult<Page<ReportDetail>> {
        let filter = ReportFilter {
            unit_work_id: Some(unit_work_id.to_string()),
            status: Some(ReportStatus::Processing),
            title_query: query.title_query(),
            ..ReportFilter::default()
        };
        self.page(&filter, query).await
    }

    /// Reports submitted by a user.
    pub async fn list_by_reporter(
        &self,
        reporter_id: &str,
        query: &ReportListQuery,
    ) -> AppResult<Page<ReportDetail>> {
        let filter = ReportFilter {
            reporter_id: Some(reporter_id.to_string()),
            status: query.status()?,
            title_query: query.title_query(),
            ..ReportFilter::default()
        };
        self.page(&filter, query).await
    }

    /// Reports resolved by an officer.
    pub async fn list_by_officer(
        &self,
        officer_id: &str,
        query: &ReportListQuery,
    ) -> AppResult<Page<ReportDetail>> {
        let filter = ReportFilter {
            officer_id: Some(officer_id.to_string()),
            status: query.status()?,
            title_query: query.title_query(),
            ..ReportFilter::default()
        };
        self.page(&filter, query).await
    }

    async fn page(
        &self,
        filter: &ReportFilter,
        query: &ReportListQuery,
    ) -> AppResult<Page<ReportDetail>> {
        let (reports, count) = self
            .report_repo
            .find_paginated(filter, query.limit(), query.skip())
            .await?;
        let items = self.enricher.enrich_all(reports).await?;
        Ok(Page { count, items })
    }
}
