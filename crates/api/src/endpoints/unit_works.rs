//! Unit work endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use lapor_common::AppResult;
use lapor_core::CreateUnitWorkInput;
use lapor_db::{entities::unit_work, repositories::CascadeSummary};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Unit work response.
#[derive(Serialize)]
pub struct UnitWorkResponse {
    pub id: String,
    pub name: String,
    pub image: Vec<String>,
    pub detail: String,
    pub created_at: String,
}

impl From<unit_work::Model> for UnitWorkResponse {
    fn from(u: unit_work::Model) -> Self {
        Self {
            image: u.images(),
            id: u.id,
            name: u.name,
            detail: u.detail,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateUnitWorkInput>,
) -> AppResult<ApiResponse<UnitWorkResponse>> {
    let unit_work = state.unit_work_service.create(&caller, input).await?;
    Ok(ApiResponse::created(unit_work.into()))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> AppResult<ApiResponse<Vec<UnitWorkResponse>>> {
    let unit_works = state.unit_work_service.list().await?;
    Ok(ApiResponse::ok(
        unit_works.into_iter().map(UnitWorkResponse::from).collect(),
    ))
}

/// Delete a unit work together with its users and reports.
async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CascadeSummary>> {
    let removed = state.unit_work_service.delete(&caller, &id).await?;
    Ok(ApiResponse::ok(removed)
        .with_message("Unit work, related users, and reports have been deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/list", get(list))
        .route("/{id}", delete(remove))
}
