//! API endpoints.

mod auth;
mod categories;
mod comments;
mod dashboard;
mod health;
mod reports;
mod unit_works;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/unit-works", unit_works::router())
        .nest("/reports", reports::router())
        .nest("/comments", comments::router())
        .nest("/dashboard", dashboard::router())
        .merge(health::router())
}
