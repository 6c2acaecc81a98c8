//! Media service.
//!
//! Stored images are private; everything the UI displays goes through a
//! time-limited signed download URL resolved per request.

use imgarena_common::{
    generate_storage_key, AppError, AppResult, Storage, UploadedFile, DEFAULT_SIGNED_URL_EXPIRY,
};

/// Maximum upload size in bytes (20 MB).
pub const MAX_UPLOAD_SIZE: usize = 20 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Media service for business logic.
#[derive(Clone)]
pub struct MediaService {
    storage: Storage,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Store an uploaded image under a fresh key.
    pub async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<UploadedFile> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Empty file".to_string()));
        }
        if data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large (max {MAX_UPLOAD_SIZE} bytes)"
            )));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::BadRequest(format!(
                "Unsupported content type: {content_type}"
            )));
        }

        let key = generate_storage_key(user_id, file_name);
        self.storage.upload(&key, data, content_type).await
    }

    /// Resolve a storage key to a 1-hour signed download URL.
    pub async fn signed_url(&self, key: &str) -> AppResult<String> {
        if key.is_empty() || key.contains("..") {
            return Err(AppError::BadRequest("Invalid storage key".to_string()));
        }
        self.storage.signed_url(key, DEFAULT_SIGNED_URL_EXPIRY).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use imgarena_common::LocalStorage;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn service() -> MediaService {
        // Validation failures never reach the backend.
        MediaService::new(Arc::new(LocalStorage::new(
            PathBuf::from("/nonexistent"),
            "/files".to_string(),
        )))
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let result = service().upload("u1", "a.png", "image/png", &[]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let result = service()
            .upload("u1", "a.html", "text/html", b"<html>")
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_signed_url_rejects_traversal() {
        let result = service().signed_url("../etc/passwd").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
