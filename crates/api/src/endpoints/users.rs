//! User endpoints.
//!
//! Lookups here are for display only; caller identity always comes from the
//! verified session token, never from an email in the request.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use imgarena_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::middleware::AppState;

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

impl From<imgarena_db::entities::user::Model> for UserResponse {
    fn from(u: imgarena_db::entities::user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Lookup-by-email request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByEmailRequest {
    pub email: String,
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.identity_service.get_user(&id).await?;
    Ok(Json(user.into()))
}

/// Read-only lookup. Never creates a user; 404 on miss.
async fn by_email(
    State(state): State<AppState>,
    Json(req): Json<ByEmailRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .identity_service
        .lookup(&req.email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(req.email))?;
    Ok(Json(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/by-email", post(by_email))
        .route("/{id}", get(get_user))
}
