//! Dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use lapor_common::AppResult;
use lapor_core::StatusSummary;
use lapor_db::repositories::ReportCoordinate;

use crate::{middleware::AppState, response::ApiResponse};

/// Report counts per status.
async fn summary(State(state): State<AppState>) -> AppResult<ApiResponse<StatusSummary>> {
    let summary = state.dashboard_service.summary().await?;
    Ok(ApiResponse::ok(summary))
}

/// Map pins of every report past the waiting stage.
async fn coordinates(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ReportCoordinate>>> {
    let coordinates = state.dashboard_service.coordinates().await?;
    Ok(ApiResponse::ok(coordinates))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/coordinates", get(coordinates))
}
