//! Media store boundary.
//!
//! Binary media (variant photos, subject videos) lives outside the database.
//! The catalog only ever persists the URL returned by a [`MediaStore`].

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// A media payload that has been durably stored.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the media.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}

/// Media store trait.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a payload under `key` and return its durable URL.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredMedia>;

    /// Remove a stored payload. Missing keys are not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem media store.
pub struct LocalMediaStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create a new local media store.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredMedia> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::ExternalService(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to write media: {e}")))?;

        Ok(StoredMedia {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
        })
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::ExternalService(format!(
                "Failed to remove media: {e}"
            ))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Generate a storage key for a variant's media file.
///
/// Keys are grouped by date and variant so a directory listing stays small.
#[must_use]
pub fn generate_media_key(variant_id: &str, original_name: &str) -> String {
    use chrono::Utc;

    let now = Utc::now();
    let date_path = now.format("%Y/%m/%d").to_string();

    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin");

    format!(
        "{date_path}/{variant_id}/{}.{}",
        uuid::Uuid::new_v4().simple(),
        extension.to_ascii_lowercase()
    )
}
