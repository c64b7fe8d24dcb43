//! S3 media store adapter.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use quill_core::domain::StoredImage;
use quill_core::error::MediaError;
use quill_core::ports::MediaStore;

/// Bound on every store round-trip; a timeout is an upstream failure like
/// any other, never a hang.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

async fn bounded<T, E>(
    call: impl Future<Output = Result<T, E>>,
    what: &str,
) -> Result<T, String>
where
    E: std::fmt::Display,
{
    match tokio::time::timeout(CALL_TIMEOUT, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(_) => Err(format!("{what} timed out after {}s", CALL_TIMEOUT.as_secs())),
    }
}

/// S3 media store configuration.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Base URL objects are publicly served from (bucket website or CDN).
    pub public_base_url: String,
}

/// Media store backed by an S3 bucket.
pub struct S3MediaStore {
    client: Client,
    config: S3Config,
}

impl S3MediaStore {
    pub fn new(client: Client, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Build a client from the ambient AWS environment (credentials chain,
    /// region, endpoint overrides).
    pub async fn from_env(config: S3Config) -> Self {
        let aws_config =
            aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&aws_config), config)
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        folder: &str,
        content_type: &str,
    ) -> Result<StoredImage, MediaError> {
        let key = format!("{folder}/{}.{}", Uuid::new_v4(), extension_for(content_type));

        let put = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send();
        bounded(put, "upload").await.map_err(MediaError::Upload)?;

        tracing::debug!(%key, "uploaded object");

        Ok(StoredImage {
            url: format!("{}/{}", self.config.public_base_url, key),
            reference: key,
        })
    }

    async fn delete(&self, reference: &str) -> Result<(), MediaError> {
        // S3 DeleteObject succeeds for absent keys, which gives the
        // idempotency the callers rely on.
        let del = self
            .client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(reference)
            .send();
        bounded(del, "delete").await.map_err(MediaError::Delete)?;

        tracing::debug!(key = %reference, "deleted object");
        Ok(())
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        _ => "bin",
    }
}
