//! Request extractors.
//!
//! The auth middleware verifies the session token once per request and
//! stashes the loaded user in request extensions; these extractors are the
//! only way handlers obtain a caller identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use imgarena_common::AppError;
use imgarena_db::entities::user;

/// Authenticated user extractor. Rejects with 401 when no verified
/// identity is attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user extractor for read paths that degrade to
/// anonymous behavior.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
