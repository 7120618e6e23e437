//! Report endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use lapor_common::AppResult;
use lapor_core::{
    AssignReportInput, CompleteReportInput, CreateReportInput, Page, ReportDetail,
};
use lapor_db::entities::report::{self, ReportStatus};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody, ListQuery, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

/// A report as stored, without enrichment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub status: ReportStatus,
    pub image_report: Vec<String>,
    pub category_id: String,
    pub reporter_id: String,
    pub unit_work_id: Option<String>,
    pub officer_report_id: Option<String>,
    pub officer_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<report::Model> for ReportResponse {
    fn from(r: report::Model) -> Self {
        Self {
            image_report: r.images(),
            id: r.id,
            title: r.title,
            description: r.description,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status,
            category_id: r.category_id,
            reporter_id: r.reporter_id,
            unit_work_id: r.unit_work_id,
            officer_report_id: r.officer_report_id,
            officer_id: r.officer_id,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.create(&user, input).await?;
    Ok(ApiResponse::created(report.into()).with_message("Report created"))
}

/// Every report, enriched, newest first.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<ReportDetail>>> {
    let reports = state.report_service.list_all().await?;
    Ok(ApiResponse::ok(reports))
}

async fn show(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReportDetail>> {
    let report = state.report_service.get(&id).await?;
    Ok(ApiResponse::ok(report))
}

async fn assign(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(input): ValidatedJson<AssignReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.assign(&caller, input).await?;
    Ok(ApiResponse::ok(report.into()).with_message("Report assigned"))
}

// The service rejects plain users before validating the body.
async fn complete(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    JsonBody(input): JsonBody<CompleteReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let (report, _resolution) = state.report_service.complete(&caller, input).await?;
    Ok(ApiResponse::ok(report.into()).with_message("Report completed"))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.report_service.delete(&caller, &id).await?;
    Ok(ApiResponse::message("Report deleted successfully"))
}

async fn by_unit_work(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    ListQuery(query): ListQuery,
) -> AppResult<ApiResponse<Page<ReportDetail>>> {
    let page = state.report_service.list_by_unit_work(&id, &query).await?;
    Ok(ApiResponse::ok(page))
}

async fn by_reporter(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    ListQuery(query): ListQuery,
) -> AppResult<ApiResponse<Page<ReportDetail>>> {
    let page = state.report_service.list_by_reporter(&id, &query).await?;
    Ok(ApiResponse::ok(page))
}

async fn by_officer(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    ListQuery(query): ListQuery,
) -> AppResult<ApiResponse<Page<ReportDetail>>> {
    let page = state.report_service.list_by_officer(&id, &query).await?;
    Ok(ApiResponse::ok(page))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/list", get(list))
        .route("/assign", post(assign))
        .route("/officer/done", post(complete))
        .route("/unit-work/{id}", get(by_unit_work))
        .route("/user/{id}", get(by_reporter))
        .route("/officer/{id}", get(by_officer))
        .route("/{id}", get(show).delete(remove))
}
