//! Liveness endpoint.

use axum::{Router, extract::State, routing::get};
use lapor_common::AppResult;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health(State(state): State<AppState>) -> AppResult<ApiResponse<Health>> {
    state.db.ping().await?;
    Ok(ApiResponse::ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
