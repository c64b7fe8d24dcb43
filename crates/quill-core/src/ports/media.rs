//! Media store port - external binary object storage for images.

use async_trait::async_trait;

use crate::domain::StoredImage;
use crate::error::MediaError;

/// Content-addressable image storage.
///
/// Uploads return a stable reference plus a public URL; deletes are
/// idempotent, so releasing an already-absent reference succeeds. Both are
/// slow external I/O and can fail independently of the entity store.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        folder: &str,
        content_type: &str,
    ) -> Result<StoredImage, MediaError>;

    async fn delete(&self, reference: &str) -> Result<(), MediaError>;
}
