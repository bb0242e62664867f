//! Upload collaborator. Stores submission artifacts and hands back the
//! metadata a submission records; the engine itself never touches file bytes.

use crate::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use util::{config::AppConfig, paths};
use validator::Validate;

/// Metadata returned by a [`FileStorage`] for one stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub url: String,
    #[validate(length(min = 1, message = "MIME type is required"))]
    pub mime_type: String,
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub size_bytes: i64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `bytes` under the folder `key` and returns the file's metadata.
    async fn store(
        &self,
        key: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredFile, ServiceError>;

    /// Removes a previously stored file by URL.
    async fn remove(&self, url: &str) -> Result<(), ServiceError>;

    /// Whether `url` points at a file this storage currently holds.
    async fn exists(&self, url: &str) -> bool;
}

/// Whether `url` names a file stored directly under `key` by a storage serving
/// from `base_url`. Nested paths and `..` segments never match.
pub fn is_issued_under(base_url: &str, key: &str, url: &str) -> bool {
    let file_name = url
        .strip_prefix(base_url.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|rest| rest.strip_prefix(key))
        .and_then(|rest| rest.strip_prefix('/'));

    match file_name {
        Some(name) => !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\']),
        None => false,
    }
}

/// Stores files on the local disk under a root directory and serves them from
/// `base_url`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Uses `STORAGE_ROOT` and `STORAGE_BASE_URL`.
    pub fn from_config() -> Self {
        Self::new(paths::storage_root(), AppConfig::global().storage_base_url)
    }

    fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.base_url)?.strip_prefix('/')
    }
}

/// Keeps only the final path component of a client-supplied name.
fn sanitize_file_name(file_name: &str) -> Option<String> {
    let name = file_name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_owned())
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(
        &self,
        key: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredFile, ServiceError> {
        let name = sanitize_file_name(file_name)
            .ok_or_else(|| ServiceError::UploadFailed("Invalid file name".into()))?;
        let stored_name = format!("{}_{}", uuid::Uuid::new_v4().simple(), name);
        let relative = format!("{key}/{stored_name}");

        let path = paths::resolve_under(&self.root, &relative)
            .ok_or_else(|| ServiceError::UploadFailed("Invalid storage key".into()))?;
        paths::ensure_parent_dir(&path)
            .map_err(|e| ServiceError::UploadFailed(format!("Failed to create directory: {e}")))?;

        let size_bytes = bytes.len() as i64;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::UploadFailed(format!("Failed to write file: {e}")))?;

        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();

        Ok(StoredFile {
            name,
            url: format!("{}/{}", self.base_url, relative),
            mime_type,
            size_bytes,
        })
    }

    async fn remove(&self, url: &str) -> Result<(), ServiceError> {
        let path = self
            .key_for_url(url)
            .and_then(|key| paths::resolve_under(&self.root, key))
            .ok_or_else(|| ServiceError::NotFound(format!("No stored file at {url}")))?;

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| ServiceError::UploadFailed(format!("Failed to remove file: {e}")))
    }

    async fn exists(&self, url: &str) -> bool {
        let Some(path) = self
            .key_for_url(url)
            .and_then(|key| paths::resolve_under(&self.root, key))
        else {
            return false;
        };
        tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores every part or none. Empty or oversized parts fail the whole upload and
/// anything already written is removed again.
pub async fn store_all(
    storage: &dyn FileStorage,
    key: &str,
    parts: Vec<UploadPart>,
    max_bytes: u64,
) -> Result<Vec<StoredFile>, ServiceError> {
    if parts.is_empty() {
        return Err(ServiceError::UploadFailed("No files were uploaded".into()));
    }
    for part in &parts {
        if part.bytes.is_empty() {
            return Err(ServiceError::UploadFailed(format!(
                "File '{}' is empty",
                part.file_name
            )));
        }
        if part.bytes.len() as u64 > max_bytes {
            return Err(ServiceError::UploadFailed(format!(
                "File '{}' exceeds the {max_bytes} byte limit",
                part.file_name
            )));
        }
    }

    let mut stored = Vec::with_capacity(parts.len());
    for part in parts {
        match storage.store(key, &part.file_name, part.bytes).await {
            Ok(file) => stored.push(file),
            Err(err) => {
                for file in &stored {
                    if let Err(cleanup) = storage.remove(&file.url).await {
                        warn!(url = %file.url, error = %cleanup, "Failed to remove partial upload");
                    }
                }
                return Err(err);
            }
        }
    }

    info!(key, count = stored.len(), "Stored uploaded files");
    Ok(stored)
}
