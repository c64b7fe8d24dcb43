//! Image references - the link between an entity and the media store.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference returned by the media store for an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Opaque key the store accepts for deletion.
    pub reference: String,
    /// Publicly reachable URL.
    pub url: String,
}

/// An entity's image: either the shared default placeholder or an object
/// owned by the entity in the media store.
///
/// Defaults are shared across all records and are never deleted from the
/// store; only `Stored` references are released when their owner goes away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    Default {
        url: String,
    },
    Stored {
        reference: String,
        original_filename: String,
        url: String,
    },
}

impl ImageRef {
    pub fn stored(image: StoredImage, original_filename: impl Into<String>) -> Self {
        Self::Stored {
            reference: image.reference,
            original_filename: original_filename.into(),
            url: image.url,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Default { url } => url,
            Self::Stored { url, .. } => url,
        }
    }

    /// The media store key, present only for owned images.
    pub fn stored_reference(&self) -> Option<&str> {
        match self {
            Self::Default { .. } => None,
            Self::Stored { reference, .. } => Some(reference.as_str()),
        }
    }
}

const POST_PHOTO_VARIANTS: u32 = 3;

/// Picks default images under a configured base URL.
///
/// Post photos rotate across three placeholder variants; the variant picker
/// is injectable so tests can pin the choice.
#[derive(Clone)]
pub struct DefaultImages {
    base_url: Arc<str>,
    pick: Arc<dyn Fn() -> u32 + Send + Sync>,
}

impl DefaultImages {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_picker(base_url, || {
            // Low bits of a v4 UUID are as good a coin flip as this needs.
            Uuid::new_v4().as_u128() as u32
        })
    }

    pub fn with_picker(
        base_url: impl Into<String>,
        pick: impl Fn() -> u32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            base_url: base_url.into().into(),
            pick: Arc::new(pick),
        }
    }

    pub fn post_photo(&self) -> ImageRef {
        let variant = (self.pick)() % POST_PHOTO_VARIANTS + 1;
        ImageRef::Default {
            url: format!("{}/defaults/default-photo-{variant}.webp", self.base_url),
        }
    }

    pub fn avatar(&self) -> ImageRef {
        ImageRef::Default {
            url: format!("{}/defaults/default-avatar-1.webp", self.base_url),
        }
    }
}

impl fmt::Debug for DefaultImages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultImages")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
