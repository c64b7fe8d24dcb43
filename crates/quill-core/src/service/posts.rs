//! Post service - create/read/list/update/delete with the publish invariant,
//! the title-confirmation guard and the comment cascade.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{DefaultImages, ImageRef, Post, PostDraft};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, Identity, MediaStore, PostRepository};
use crate::sanitize;

use super::{PhotoUpload, POSTS_FOLDER};

/// A post together with its comment count, as served to readers.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub comment_count: u64,
}

/// Raw post fields as received from the surface, before sanitization.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub description: String,
    pub published: bool,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStore>,
    defaults: DefaultImages,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStore>,
        defaults: DefaultImages,
    ) -> Self {
        Self {
            posts,
            comments,
            media,
            defaults,
        }
    }

    /// Create a post owned by the caller.
    ///
    /// A photo, when present, is uploaded before anything is persisted; an
    /// upload failure aborts the whole create so no partial post exists.
    pub async fn create(
        &self,
        identity: Option<&Identity>,
        input: PostInput,
        photo: Option<PhotoUpload>,
    ) -> Result<Post, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let draft = validate(input)?;

        let photo_ref = match photo {
            Some(upload) => {
                let stored = self
                    .media
                    .upload(upload.bytes, POSTS_FOLDER, &upload.content_type)
                    .await?;
                ImageRef::stored(stored, upload.original_filename)
            }
            None => self.defaults.post_photo(),
        };

        let post = Post::new(identity.user_id, draft, photo_ref);
        Ok(self.posts.insert(post).await?)
    }

    /// All published posts, newest first, with comment counts.
    pub async fn list_published(&self) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_published().await?;
        self.with_counts(posts).await
    }

    /// The caller's own posts, drafts included, with comment counts.
    pub async fn list_by_author(
        &self,
        identity: Option<&Identity>,
    ) -> Result<Vec<PostView>, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let posts = self.posts.find_by_author(identity.user_id).await?;
        self.with_counts(posts).await
    }

    /// Read one post. An unpublished post is visible only to its author;
    /// everyone else, anonymous included, is turned away.
    pub async fn get(
        &self,
        id: Uuid,
        viewer: Option<&Identity>,
    ) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if !post.published && viewer.map(|v| v.user_id) != Some(post.author_id) {
            return Err(DomainError::Unauthorized);
        }

        let comment_count = self.comments.count_by_post(post.id).await?;
        Ok(PostView {
            post,
            comment_count,
        })
    }

    /// Load a post for editing; only the author may.
    pub async fn get_for_edit(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
    ) -> Result<PostView, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if post.author_id != identity.user_id {
            return Err(DomainError::Unauthorized);
        }

        let comment_count = self.comments.count_by_post(post.id).await?;
        Ok(PostView {
            post,
            comment_count,
        })
    }

    /// Update a post the caller owns.
    ///
    /// `created_at` and `author_id` carry over from the stored record, and a
    /// published post can never be unpublished. A replacement photo is
    /// uploaded before the row is written; the superseded non-default photo
    /// is released only after the row update succeeds, so the post never
    /// references a deleted image.
    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        input: PostInput,
        photo: Option<PhotoUpload>,
    ) -> Result<Post, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let draft = validate(input)?;

        let existing = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if existing.author_id != identity.user_id {
            return Err(DomainError::Unauthorized);
        }

        if existing.published && !draft.published {
            return Err(DomainError::validation(
                "a published post can't be unpublished",
            ));
        }

        let new_photo = match &photo {
            Some(upload) => {
                let stored = self
                    .media
                    .upload(upload.bytes.clone(), POSTS_FOLDER, &upload.content_type)
                    .await?;
                ImageRef::stored(stored, upload.original_filename.clone())
            }
            None => existing.photo.clone(),
        };

        let uploaded_reference = new_photo.stored_reference().map(str::to_owned);
        let updated = Post {
            id: existing.id,
            author_id: existing.author_id,
            title: draft.title,
            content: draft.content,
            description: draft.description,
            photo: new_photo,
            published: draft.published,
            created_at: existing.created_at,
            edited_at: Some(Utc::now()),
        };

        let saved = match self.posts.update(updated).await {
            Ok(saved) => saved,
            Err(err) => {
                if let (Some(reference), true) = (uploaded_reference, photo.is_some()) {
                    tracing::warn!(%reference, "post update failed after photo upload, new object may dangle");
                }
                return Err(err.into());
            }
        };

        // The row is committed; release the superseded photo. A failure here
        // is surfaced but never rolls the update back.
        if photo.is_some() {
            self.release(&existing.photo).await?;
        }

        Ok(saved)
    }

    /// Delete a post the caller owns.
    ///
    /// The caller must repeat the exact current title as confirmation. The
    /// comment cascade runs before the post row goes away, so no comment is
    /// ever readable under a missing post; the photo is released last.
    pub async fn delete(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        confirmation: &str,
    ) -> Result<(), DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if post.author_id != identity.user_id {
            return Err(DomainError::Unauthorized);
        }

        if confirmation != post.title {
            return Err(DomainError::validation("confirmation title didn't match"));
        }

        let removed = self.comments.delete_by_post(id).await?;
        tracing::debug!(post_id = %id, removed, "deleted comments under post");

        match self.posts.delete(id).await {
            // A concurrent delete already removed the row; the cascade above
            // still ran, so treat it as done.
            Ok(()) | Err(RepoError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }

        self.release(&post.photo).await
    }

    /// Release a non-default photo from the media store. Failures are logged
    /// for operator reconciliation and surfaced as upstream errors.
    async fn release(&self, photo: &ImageRef) -> Result<(), DomainError> {
        let Some(reference) = photo.stored_reference() else {
            return Ok(());
        };
        if let Err(err) = self.media.delete(reference).await {
            tracing::error!(%reference, %err, "failed to release photo");
            return Err(err.into());
        }
        Ok(())
    }

    async fn with_counts(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let comment_count = self.comments.count_by_post(post.id).await?;
            views.push(PostView {
                post,
                comment_count,
            });
        }
        Ok(views)
    }
}

fn validate(input: PostInput) -> Result<PostDraft, DomainError> {
    let title = sanitize::clean(&input.title).trim().to_string();
    let content = sanitize::clean(&input.content);
    let description = sanitize::clean(&input.description).trim().to_string();

    if title.chars().count() < 5 {
        return Err(DomainError::validation(
            "title must be at least 5 characters",
        ));
    }
    if content.chars().count() < 26 {
        return Err(DomainError::validation(
            "content must be at least 26 characters",
        ));
    }
    if description.chars().count() < 5 {
        return Err(DomainError::validation(
            "description must be at least 5 characters",
        ));
    }

    Ok(PostDraft {
        title,
        content,
        description,
        published: input.published,
    })
}
