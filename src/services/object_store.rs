//! src/services/object_store.rs
//!
//! The narrow key/value surface the gateway needs from a blob backend:
//! put, get, prefix-list, and a bucket probe. `S3ObjectStore` talks to S3;
//! `MemoryObjectStore` keeps everything in-process for tests and local runs.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("object `{key}` not found in bucket `{bucket}`")]
    NotFound { bucket: String, key: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Blob backend addressed by (bucket, key).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> BackendResult<()>;

    /// Read the full object. Missing keys yield `BackendError::NotFound`.
    async fn get(&self, bucket: &str, key: &str) -> BackendResult<Bytes>;

    /// Every key in `bucket` starting with `prefix`, in backend order.
    async fn list_by_prefix(&self, bucket: &str, prefix: &str) -> BackendResult<Vec<String>>;

    /// Verify the bucket is reachable with the configured credentials.
    async fn check_bucket(&self, bucket: &str) -> BackendResult<()>;
}

/// In-process backend. Keys are kept sorted per bucket, matching the
/// lexicographic order S3 returns from ListObjectsV2.
#[derive(Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, Bytes>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> BackendResult<()> {
        let mut buckets = self.buckets.write().await;
        let previous = buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body);
        if previous.is_some() {
            debug!("overwrote in-memory object {}/{}", bucket, key);
        }
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> BackendResult<Bytes> {
        let buckets = self.buckets.read().await;
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| BackendError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn list_by_prefix(&self, bucket: &str, prefix: &str) -> BackendResult<Vec<String>> {
        let buckets = self.buckets.read().await;
        let Some(objects) = buckets.get(bucket) else {
            return Ok(Vec::new());
        };
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn check_bucket(&self, _bucket: &str) -> BackendResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_what_was_put() {
        let store = MemoryObjectStore::new();
        store
            .put("files", "sandy/a.txt", Bytes::from_static(b"alpha"))
            .await
            .unwrap();

        let body = store.get("files", "sandy/a.txt").await.unwrap();
        assert_eq!(body, Bytes::from_static(b"alpha"));
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let store = MemoryObjectStore::new();
        store
            .put("files", "sandy/a.txt", Bytes::from_static(b"alpha"))
            .await
            .unwrap();

        let err = store.get("files", "sandy/b.txt").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { ref key, .. } if key == "sandy/b.txt"));

        let err = store.get("other-bucket", "sandy/a.txt").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_by_prefix_is_sorted_and_bounded() {
        let store = MemoryObjectStore::new();
        for key in ["sandy/c.txt", "sandra/x.txt", "sandy/a.txt", "sandy0/z.txt"] {
            store.put("files", key, Bytes::new()).await.unwrap();
        }

        let keys = store.list_by_prefix("files", "sandy/").await.unwrap();
        assert_eq!(keys, vec!["sandy/a.txt", "sandy/c.txt"]);
    }

    #[tokio::test]
    async fn list_by_prefix_on_unknown_bucket_is_empty() {
        let store = MemoryObjectStore::new();
        let keys = store.list_by_prefix("nope", "sandy/").await.unwrap();
        assert!(keys.is_empty());
    }
}
