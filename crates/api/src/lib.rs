//! HTTP API layer for lapor-rs.
//!
//! - **Endpoints**: auth, users, categories, unit works, reports, comments
//!   and the dashboard, all under `/api`
//! - **Extractors**: authentication and validated JSON bodies
//! - **Middleware**: bearer token resolution
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state};
use lapor_common::AppError;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

/// Build the application router with authentication and state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}
