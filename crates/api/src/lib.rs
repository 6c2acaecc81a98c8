//! HTTP API layer for imgarena.
//!
//! - **Endpoints**: session, comparison, rating, and image routes
//! - **Extractors**: authenticated-user extraction from request extensions
//! - **Middleware**: token verification feeding the extractors
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;
pub use middleware::{auth_middleware, AppState};
