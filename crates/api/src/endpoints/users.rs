//! User endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use lapor_common::AppResult;
use lapor_core::CreateStaffInput;
use lapor_db::entities::user;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

/// The authenticated caller.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<user::Model> {
    ApiResponse::ok(user)
}

/// Create an officer or admin account.
async fn create_staff(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateStaffInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.create_staff(&caller, input).await?;
    Ok(ApiResponse::created(user))
}

async fn show(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.get_as_admin(&caller, &id).await?;
    Ok(ApiResponse::ok(user))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff))
        .route("/me", get(me))
        .route("/{id}", get(show))
}
