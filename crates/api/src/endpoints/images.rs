//! Image endpoints.
//!
//! Uploads land in the configured storage backend under a generated key;
//! the sign endpoint trades a key for a time-limited download URL so the
//! objects themselves stay private.

use axum::{
    extract::{Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};
use imgarena_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState};

/// Upload response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
    pub md5: String,
}

/// Sign query parameters.
#[derive(Debug, Deserialize)]
pub struct SignQuery {
    pub key: String,
}

/// Sign response.
#[derive(Serialize)]
pub struct SignResponse {
    pub url: String,
}

/// Upload an image via multipart form.
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(std::string::ToString::to_string);
            content_type = field.content_type().map(std::string::ToString::to_string);
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .to_vec(),
            );
        }
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let name = file_name.unwrap_or_else(|| "unnamed".to_string());
    let content_type =
        content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let uploaded = state
        .media_service
        .upload(&user.id, &name, &content_type, &data)
        .await?;

    Ok(Json(UploadResponse {
        key: uploaded.key,
        url: uploaded.url,
        size: uploaded.size,
        content_type: uploaded.content_type,
        md5: uploaded.md5,
    }))
}

/// Resolve a storage key to a signed download URL.
async fn sign(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SignQuery>,
) -> AppResult<Json<SignResponse>> {
    let url = state.media_service.signed_url(&query.key).await?;
    Ok(Json(SignResponse { url }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/sign", get(sign))
}
