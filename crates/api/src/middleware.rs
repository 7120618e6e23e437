//! API middleware and shared state.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use lapor_core::{
    CategoryService, CommentService, DashboardService, ReportEnricher, ReportService,
    UnitWorkService, UserService,
};
use lapor_db::repositories::{
    CategoryRepository, CommentRepository, OfficerReportRepository, ReportRepository,
    UnitWorkRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::extractors::BearerToken;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub user_service: UserService,
    pub report_service: ReportService,
    pub category_service: CategoryService,
    pub unit_work_service: UnitWorkService,
    pub comment_service: CommentService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let category_repo = CategoryRepository::new(Arc::clone(&db));
        let unit_work_repo = UnitWorkRepository::new(Arc::clone(&db));
        let report_repo = ReportRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let officer_report_repo = OfficerReportRepository::new(Arc::clone(&db));

        let enricher = ReportEnricher::new(
            user_repo.clone(),
            category_repo.clone(),
            unit_work_repo.clone(),
            officer_report_repo,
            comment_repo.clone(),
        );

        Self {
            user_service: UserService::new(user_repo, unit_work_repo.clone()),
            report_service: ReportService::new(
                report_repo.clone(),
                category_repo.clone(),
                unit_work_repo.clone(),
                enricher,
            ),
            category_service: CategoryService::new(category_repo),
            unit_work_service: UnitWorkService::new(unit_work_repo),
            comment_service: CommentService::new(comment_repo, report_repo.clone()),
            dashboard_service: DashboardService::new(report_repo),
            db,
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` into the caller and stores it,
/// with the token, in the request extensions. Requests without a valid
/// token pass through anonymously; protected handlers reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    if let Some(token) = token {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
                req.extensions_mut().insert(BearerToken(token));
            }
            Err(e) if e.is_server_error() => {
                warn!(error = %e, "Token lookup failed");
            }
            Err(_) => {}
        }
    }

    next.run(req).await
}
