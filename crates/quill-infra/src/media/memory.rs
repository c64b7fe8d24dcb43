//! In-memory media store - used when no object storage is configured and by
//! the HTTP-level tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::StoredImage;
use quill_core::error::MediaError;
use quill_core::ports::MediaStore;

/// Keeps uploaded objects in a HashMap behind an async RwLock.
pub struct InMemoryMediaStore {
    base_url: String,
    seq: AtomicU64,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            seq: AtomicU64::new(0),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, reference: &str) -> bool {
        self.objects.read().await.contains_key(reference)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for InMemoryMediaStore {
    fn default() -> Self {
        Self::new("https://media.invalid")
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        folder: &str,
        _content_type: &str,
    ) -> Result<StoredImage, MediaError> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let reference = format!("{folder}/{n:08}");
        self.objects.write().await.insert(reference.clone(), bytes);

        Ok(StoredImage {
            url: format!("{}/{}", self.base_url, reference),
            reference,
        })
    }

    async fn delete(&self, reference: &str) -> Result<(), MediaError> {
        // Idempotent: deleting an absent reference is not an error.
        self.objects.write().await.remove(reference);
        Ok(())
    }
}
