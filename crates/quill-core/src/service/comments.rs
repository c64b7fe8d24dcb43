//! Comment service - creation under an existing parent post, ownership
//! checks, and the path/stored post-id consistency rule.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Comment;
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, Identity, PostRepository};
use crate::sanitize;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Create a comment under `post_id`. The parent post must exist.
    pub async fn create(
        &self,
        identity: Option<&Identity>,
        post_id: Uuid,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let content = validate_content(content)?;

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("parent post"));
        }

        let comment = Comment::new(post_id, identity.user_id, content);
        Ok(self.comments.insert(comment).await?)
    }

    /// All comments on a post, oldest first. Public; a missing post simply
    /// has no comments, since comments never outlive their post.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.find_by_post(post_id).await?)
    }

    /// Update a comment the caller owns. The stored parent must match the
    /// post id named in the request path.
    pub async fn update(
        &self,
        identity: Option<&Identity>,
        post_id: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let content = validate_content(content)?;

        let existing = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment"))?;

        if existing.author_id != identity.user_id {
            return Err(DomainError::Unauthorized);
        }
        if existing.post_id != post_id {
            return Err(DomainError::validation(
                "comment doesn't belong to this post",
            ));
        }

        let updated = Comment {
            id: existing.id,
            post_id: existing.post_id,
            author_id: existing.author_id,
            content,
            created_at: existing.created_at,
            edited_at: Some(Utc::now()),
        };
        Ok(self.comments.update(updated).await?)
    }

    /// Delete a comment the caller owns. No media side effects.
    pub async fn delete(
        &self,
        identity: Option<&Identity>,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;

        let existing = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment"))?;

        if existing.author_id != identity.user_id {
            return Err(DomainError::Unauthorized);
        }
        if existing.post_id != post_id {
            return Err(DomainError::validation(
                "comment doesn't belong to this post",
            ));
        }

        match self.comments.delete(comment_id).await {
            Ok(()) | Err(RepoError::NotFound) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn validate_content(content: &str) -> Result<String, DomainError> {
    let cleaned = sanitize::clean(content).trim().to_string();
    if cleaned.is_empty() {
        return Err(DomainError::validation("content must be specified"));
    }
    Ok(cleaned)
}
