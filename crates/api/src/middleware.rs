//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use imgarena_core::{ComparisonService, IdentityService, MediaService, RatingService};

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "auth_token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub comparison_service: ComparisonService,
    pub rating_service: RatingService,
    pub media_service: MediaService,
}

/// Authentication middleware.
///
/// Accepts the session token from either the `Authorization: Bearer`
/// header or the session cookie, verifies it through the identity service,
/// and attaches the loaded user to request extensions. Requests without a
/// valid token pass through anonymously; handlers that require identity
/// reject via the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = bearer_token(&req)
        .map(ToString::to_string)
        .or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_string()));

    if let Some(token) = token {
        match state.identity_service.verify_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
            }
        }
    }

    next.run(req).await
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
