//! src/services/s3_store.rs
//!
//! `ObjectStore` backed by Amazon S3 (or any S3-compatible endpoint) through
//! the AWS SDK. Credentials come from the standard provider chain.

use crate::{
    config::AppConfig,
    services::object_store::{BackendError, BackendResult, ObjectStore},
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, meta::region::RegionProviderChain};
use aws_sdk_s3::{
    Client,
    config::Region,
    error::DisplayErrorContext,
    operation::get_object::GetObjectError,
    primitives::ByteStream,
};
use bytes::Bytes;
use tracing::debug;

const FALLBACK_REGION: &str = "us-east-1";

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build an SDK client from the gateway config.
    ///
    /// Region resolution: explicit config, then the AWS default chain, then
    /// `us-east-1`. A custom endpoint and path-style addressing are applied
    /// on top for MinIO-like deployments.
    pub async fn from_config(cfg: &AppConfig) -> Self {
        let region_provider = RegionProviderChain::first_try(cfg.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(FALLBACK_REGION);
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(cfg.force_path_style);
        if let Some(endpoint) = &cfg.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> BackendResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(backend_failure)?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> BackendResult<Bytes> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(GetObjectError::is_no_such_key) =>
            {
                return Err(BackendError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                });
            }
            Err(err) => return Err(backend_failure(err)),
        };

        let data = output.body.collect().await.map_err(backend_failure)?;
        Ok(data.into_bytes())
    }

    /// Follows continuation tokens until the listing is exhausted; pages are
    /// appended in the order S3 returns them.
    async fn list_by_prefix(&self, bucket: &str, prefix: &str) -> BackendResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;
        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(backend_failure)?;

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_owned)),
            );

            match resp.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_owned()),
                None => break,
            }
            debug!("listing {} continues past {} keys", prefix, keys.len());
        }
        Ok(keys)
    }

    async fn check_bucket(&self, bucket: &str) -> BackendResult<()> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(backend_failure)?;
        Ok(())
    }
}

/// Wrap any SDK failure as an opaque backend error, keeping the full cause chain
/// in the message.
fn backend_failure<E>(err: E) -> BackendError
where
    E: std::error::Error,
{
    BackendError::Other(anyhow::anyhow!("{}", DisplayErrorContext(err)))
}
