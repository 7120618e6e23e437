//! Relational enrichment of reports.
//!
//! Reports store bare IDs. Reads resolve them into small projections with
//! one batched query per referenced table. A reference whose target is
//! gone (deleted user, unit work or category) is not an error: it
//! projects as [`UNKNOWN_NAME`] with a null id. This is the only guard
//! against dangling references, since deletes of categories and users do
//! not touch the reports that point at them.

use std::collections::HashMap;

use lapor_common::AppResult;
use lapor_db::{
    entities::{
        category, comment, officer_report,
        report::{self, ReportStatus},
        unit_work, user,
    },
    repositories::{
        CategoryRepository, CommentRepository, OfficerReportRepository, UnitWorkRepository,
        UserRepository,
    },
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Name shown for references that are unset or point at a deleted row.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A stored reference, resolved at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a, T> {
    /// No id stored.
    Unset,
    /// Target found.
    Resolved(&'a T),
    /// Id stored but the target no longer exists.
    Dangling(&'a str),
}

impl<'a, T> Reference<'a, T> {
    /// Resolve `id` against rows loaded for a batch.
    pub fn lookup(id: Option<&'a str>, rows: &'a HashMap<String, T>) -> Self {
        match id {
            None => Self::Unset,
            Some(id) => rows.get(id).map_or(Self::Dangling(id), Self::Resolved),
        }
    }

    #[must_use]
    pub const fn resolved(&self) -> Option<&'a T> {
        match self {
            Self::Resolved(target) => Some(target),
            Self::Unset | Self::Dangling(_) => None,
        }
    }
}

/// Rows that can be projected as `{id, name}`.
pub trait Named {
    fn ref_id(&self) -> &str;
    fn ref_name(&self) -> &str;
}

impl Named for user::Model {
    fn ref_id(&self) -> &str {
        &self.id
    }

    fn ref_name(&self) -> &str {
        &self.name
    }
}

impl Named for unit_work::Model {
    fn ref_id(&self) -> &str {
        &self.id
    }

    fn ref_name(&self) -> &str {
        &self.name
    }
}

/// `{id, name}` projection of a user or unit work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: Option<String>,
    pub name: String,
}

impl NamedRef {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            id: None,
            name: UNKNOWN_NAME.to_string(),
        }
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.id.is_none()
    }
}

impl<T: Named> From<Reference<'_, T>> for NamedRef {
    fn from(reference: Reference<'_, T>) -> Self {
        reference.resolved().map_or_else(Self::unknown, |target| Self {
            id: Some(target.ref_id().to_string()),
            name: target.ref_name().to_string(),
        })
    }
}

/// `{id, name, image}` projection of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: Option<String>,
    pub name: String,
    pub image: Option<String>,
}

impl From<Reference<'_, category::Model>> for CategoryRef {
    fn from(reference: Reference<'_, category::Model>) -> Self {
        match reference.resolved() {
            Some(c) => Self {
                id: Some(c.id.clone()),
                name: c.name.clone(),
                image: Some(c.image.clone()),
            },
            None => Self {
                id: None,
                name: UNKNOWN_NAME.to_string(),
                image: None,
            },
        }
    }
}

/// `{message, imageReport}` projection of an officer report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerReportRef {
    pub message: String,
    pub image_report: Vec<String>,
}

impl OfficerReportRef {
    /// `None` when the report has no resolution yet.
    fn project(reference: Reference<'_, officer_report::Model>) -> Option<Self> {
        match reference {
            Reference::Unset => None,
            Reference::Resolved(record) => Some(Self {
                message: record.message.clone(),
                image_report: record.images(),
            }),
            Reference::Dangling(_) => Some(Self {
                message: UNKNOWN_NAME.to_string(),
                image_report: Vec::new(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<&comment::Model> for CommentView {
    fn from(c: &comment::Model) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            message: c.message.clone(),
            created_at: c.created_at,
        }
    }
}

/// A report with every reference resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub status: ReportStatus,
    pub image_report: Vec<String>,
    pub category: CategoryRef,
    pub reporter: NamedRef,
    pub unit_works: NamedRef,
    pub officer: NamedRef,
    pub officer_report: Option<OfficerReportRef>,
    pub comment: Vec<CommentView>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Rows referenced by one batch of reports, keyed by id.
#[derive(Default)]
struct Lookups {
    users: HashMap<String, user::Model>,
    categories: HashMap<String, category::Model>,
    unit_works: HashMap<String, unit_work::Model>,
    officer_reports: HashMap<String, officer_report::Model>,
    comments: HashMap<String, Vec<comment::Model>>,
}

impl Lookups {
    fn detail(&self, report: report::Model) -> ReportDetail {
        let image_report = report.images();
        let comment = self
            .comments
            .get(&report.id)
            .map(|list| list.iter().map(CommentView::from).collect())
            .unwrap_or_default();

        ReportDetail {
            category: Reference::lookup(Some(report.category_id.as_str()), &self.categories).into(),
            reporter: Reference::lookup(Some(report.reporter_id.as_str()), &self.users).into(),
            unit_works: Reference::lookup(report.unit_work_id.as_deref(), &self.unit_works)
                .into(),
            officer: Reference::lookup(report.officer_id.as_deref(), &self.users).into(),
            officer_report: OfficerReportRef::project(Reference::lookup(
                report.officer_report_id.as_deref(),
                &self.officer_reports,
            )),
            comment,
            image_report,
            id: report.id,
            title: report.title,
            description: report.description,
            address: report.address,
            latitude: report.latitude,
            longitude: report.longitude,
            status: report.status,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

fn index_by<T>(rows: Vec<T>, key: impl Fn(&T) -> &str) -> HashMap<String, T> {
    rows.into_iter().map(|row| (key(&row).to_string(), row)).collect()
}

fn distinct(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Resolves report references into [`ReportDetail`]s.
#[derive(Clone)]
pub struct ReportEnricher {
    user_repo: UserRepository,
    category_repo: CategoryRepository,
    unit_work_repo: UnitWorkRepository,
    officer_report_repo: OfficerReportRepository,
    comment_repo: CommentRepository,
}

impl ReportEnricher {
    /// Create a new enricher.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        category_repo: CategoryRepository,
        unit_work_repo: UnitWorkRepository,
        officer_report_repo: OfficerReportRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            user_repo,
            category_repo,
            unit_work_repo,
            officer_report_repo,
            comment_repo,
        }
    }

    /// Enrich a single report.
    pub async fn enrich(&self, report: report::Model) -> AppResult<ReportDetail> {
        let mut details = self.enrich_all(vec![report]).await?;
        Ok(details.remove(0))
    }

    /// Enrich a batch, preserving order.
    pub async fn enrich_all(&self, reports: Vec<report::Model>) -> AppResult<Vec<ReportDetail>> {
        if reports.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids = distinct(reports.iter().flat_map(|r| {
            std::iter::once(r.reporter_id.clone()).chain(r.officer_id.clone())
        }));
        let category_ids = distinct(reports.iter().map(|r| r.category_id.clone()));
        let unit_work_ids = distinct(reports.iter().filter_map(|r| r.unit_work_id.clone()));
        let officer_report_ids =
            distinct(reports.iter().filter_map(|r| r.officer_report_id.clone()));
        let report_ids: Vec<String> = reports.iter().map(|r| r.id.clone()).collect();

        let (users, categories, unit_works, officer_reports, comments) = tokio::try_join!(
            self.user_repo.find_by_ids(&user_ids),
            self.category_repo.find_by_ids(&category_ids),
            self.unit_work_repo.find_by_ids(&unit_work_ids),
            self.officer_report_repo.find_by_ids(&officer_report_ids),
            self.comment_repo.find_by_reports(&report_ids),
        )?;

        let mut by_report: HashMap<String, Vec<comment::Model>> = HashMap::new();
        for c in comments {
            by_report.entry(c.report_id.clone()).or_default().push(c);
        }

        let lookups = Lookups {
            users: index_by(users, |u| &u.id),
            categories: index_by(categories, |c| &c.id),
            unit_works: index_by(unit_works, |u| &u.id),
            officer_reports: index_by(officer_reports, |o| &o.id),
            comments: by_report,
        };

        Ok(reports.into_iter().map(|r| lookups.detail(r)).collect())
    }
}
