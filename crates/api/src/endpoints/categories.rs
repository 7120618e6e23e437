//! Category endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use lapor_common::AppResult;
use lapor_core::CreateCategoryInput;
use lapor_db::entities::category;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCategoryInput>,
) -> AppResult<ApiResponse<category::Model>> {
    let category = state.category_service.create(&caller, input).await?;
    Ok(ApiResponse::created(category))
}

/// Public category list, newest first.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<category::Model>>> {
    let categories = state.category_service.list().await?;
    Ok(ApiResponse::ok(categories))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.category_service.delete(&caller, &id).await?;
    Ok(ApiResponse::message("Category deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/list", get(list))
        .route("/{id}", delete(remove))
}
