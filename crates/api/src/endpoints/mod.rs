//! API endpoints.

mod auth;
mod comparisons;
mod images;
mod ratings;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/comparisons", comparisons::router())
        .nest("/ratings", ratings::router())
        .nest("/images", images::router())
}
