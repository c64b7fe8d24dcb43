use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageRef;

/// Post entity - a blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// The owning user. Immutable after creation.
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: String,
    pub photo: ImageRef,
    /// One-way flag: once true it can never go back to false.
    pub published: bool,
    pub created_at: DateTime<Utc>,
    /// Absent until the first edit, then refreshed on every edit.
    pub edited_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft, photo: ImageRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            content: draft.content,
            description: draft.description,
            photo,
            published: draft.published,
            created_at: Utc::now(),
            edited_at: None,
        }
    }
}

/// Sanitized, validated post fields shared by create and update.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub description: String,
    pub published: bool,
}
