//! src/services/storage_service.rs
//!
//! StorageService: per-user file operations on top of an `ObjectStore`.
//! Every file lives under `{username}/{filename}` in one configured bucket;
//! the backend's prefix listing doubles as the per-user index.

use crate::{
    models::stored_file::StoredFile,
    services::object_store::{BackendError, ObjectStore},
};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file `{filename}` not found for user `{username}`")]
    FileNotFound { username: String, filename: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Settings fixed at startup and shared read-only by every request.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Bucket holding every user's files.
    pub bucket: String,
}

/// StorageService provides the three user-facing operations:
/// - Upload a file (put under the user's key, overwriting silently)
/// - Download a file (NotFound kept distinct from other backend faults)
/// - List a user's files, optionally filtered by a case-insensitive substring
///
/// Nothing is retried; backend errors surface as-is.
#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    config: Arc<GatewayConfig>,
}

impl StorageService {
    pub fn new(store: Arc<dyn ObjectStore>, config: GatewayConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Store `content` as `filename` for `username`.
    pub async fn upload(
        &self,
        username: &str,
        filename: &str,
        content: Bytes,
    ) -> StorageResult<()> {
        let key = StoredFile::new(username, filename).key();
        debug!("uploading {} bytes to {}/{}", content.len(), self.bucket(), key);
        self.store.put(self.bucket(), &key, content).await?;
        Ok(())
    }

    /// Fetch the full content of `filename` for `username`.
    pub async fn download(&self, username: &str, filename: &str) -> StorageResult<Bytes> {
        let key = StoredFile::new(username, filename).key();
        match self.store.get(self.bucket(), &key).await {
            Ok(content) => {
                debug!("downloaded {} bytes from {}/{}", content.len(), self.bucket(), key);
                Ok(content)
            }
            Err(BackendError::NotFound { .. }) => Err(StorageError::FileNotFound {
                username: username.to_string(),
                filename: filename.to_string(),
            }),
            Err(err) => Err(StorageError::Backend(err)),
        }
    }

    /// List the filenames owned by `username` that contain `search_key`,
    /// ignoring case. An empty `search_key` lists everything.
    ///
    /// Keeps the backend's listing order.
    pub async fn list_files(&self, username: &str, search_key: &str) -> StorageResult<Vec<String>> {
        let prefix = StoredFile::user_prefix(username);
        let keys = self.store.list_by_prefix(self.bucket(), &prefix).await?;
        let needle = search_key.to_lowercase();

        let filenames: Vec<String> = keys
            .iter()
            .filter_map(|key| StoredFile::filename_from_key(&prefix, key))
            .filter(|filename| filename.to_lowercase().contains(&needle))
            .map(str::to_owned)
            .collect();

        debug!(
            "search `{}` for {} matched {} of {} keys",
            search_key,
            username,
            filenames.len(),
            keys.len()
        );
        Ok(filenames)
    }

    /// Probe the configured bucket.
    pub async fn check_backend(&self) -> StorageResult<()> {
        self.store.check_bucket(self.bucket()).await?;
        Ok(())
    }
}
