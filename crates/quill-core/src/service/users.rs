//! User service - signup, credential checks, profile updates and the
//! account-deletion cascade.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{DefaultImages, ImageRef, ProfileDraft, User, UserDraft};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    CommentRepository, Identity, MediaStore, PasswordService, PostRepository, UserRepository,
};

use super::{PhotoUpload, AVATARS_FOLDER};

/// The caller's own record with their authorship counts.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub post_count: u64,
    pub comment_count: u64,
}

/// Raw signup input as received from the surface.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub password: String,
    pub password_confirm: String,
}

/// Raw basic-information update input.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStore>,
    passwords: Arc<dyn PasswordService>,
    defaults: DefaultImages,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStore>,
        passwords: Arc<dyn PasswordService>,
        defaults: DefaultImages,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            media,
            passwords,
            defaults,
        }
    }

    /// Public signup. The only create that needs no caller identity.
    pub async fn signup(
        &self,
        input: SignupInput,
        avatar: Option<PhotoUpload>,
    ) -> Result<User, DomainError> {
        let draft = validate_person(
            &input.first_name,
            &input.last_name,
            &input.email,
            input.date_of_birth,
        )?;
        if input.password.is_empty() {
            return Err(DomainError::validation("password must be specified"));
        }
        if input.password != input.password_confirm {
            return Err(DomainError::validation("passwords don't match"));
        }

        if self.users.find_by_email(&draft.email).await?.is_some() {
            return Err(DomainError::Conflict("that email is already taken".into()));
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| DomainError::Upstream(e.to_string()))?;

        let avatar_ref = match avatar {
            Some(upload) => {
                let stored = self
                    .media
                    .upload(upload.bytes, AVATARS_FOLDER, &upload.content_type)
                    .await?;
                ImageRef::stored(stored, upload.original_filename)
            }
            None => self.defaults.avatar(),
        };

        let user = User::new(
            UserDraft {
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                date_of_birth: draft.date_of_birth,
            },
            password_hash,
            avatar_ref,
        );
        Ok(self.users.insert(user).await?)
    }

    /// Check login credentials. Unknown email and wrong password fail the
    /// same way, so the response never reveals which one it was.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let ok = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Upstream(e.to_string()))?;
        if !ok {
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    /// The caller's own record with post/comment counts.
    pub async fn profile(&self, identity: Option<&Identity>) -> Result<UserProfile, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        let post_count = self.posts.count_by_author(user.id).await?;
        let comment_count = self.comments.count_by_author(user.id).await?;
        Ok(UserProfile {
            user,
            post_count,
            comment_count,
        })
    }

    /// Update the caller's own basic information. The record id always comes
    /// from the identity, never from client input.
    pub async fn update_basic(
        &self,
        identity: Option<&Identity>,
        input: ProfileInput,
        avatar: Option<PhotoUpload>,
    ) -> Result<User, DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let draft = validate_person(
            &input.first_name,
            &input.last_name,
            &input.email,
            input.date_of_birth,
        )?;

        let existing = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        // The email may stay the same, but it must not collide with anyone else's.
        if let Some(holder) = self.users.find_by_email(&draft.email).await? {
            if holder.id != existing.id {
                return Err(DomainError::Conflict("that email is already taken".into()));
            }
        }

        let new_avatar = match &avatar {
            Some(upload) => {
                let stored = self
                    .media
                    .upload(upload.bytes.clone(), AVATARS_FOLDER, &upload.content_type)
                    .await?;
                ImageRef::stored(stored, upload.original_filename.clone())
            }
            None => existing.avatar.clone(),
        };

        let updated = User {
            id: existing.id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            date_of_birth: draft.date_of_birth,
            password_hash: existing.password_hash.clone(),
            avatar: new_avatar,
            created_at: existing.created_at,
        };
        let saved = self.users.update(updated).await?;

        // Row committed; release the superseded avatar.
        if avatar.is_some() {
            self.release(&existing.avatar).await?;
        }

        Ok(saved)
    }

    /// Change the caller's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        identity: Option<&Identity>,
        old_password: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> Result<(), DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        if new_password.is_empty() {
            return Err(DomainError::validation("password must be specified"));
        }
        if new_password != new_password_confirm {
            return Err(DomainError::validation("passwords don't match"));
        }

        let existing = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        let ok = self
            .passwords
            .verify(old_password, &existing.password_hash)
            .map_err(|e| DomainError::Upstream(e.to_string()))?;
        if !ok {
            return Err(DomainError::Unauthorized);
        }

        let password_hash = self
            .passwords
            .hash(new_password)
            .map_err(|e| DomainError::Upstream(e.to_string()))?;

        let updated = User {
            password_hash,
            ..existing
        };
        self.users.update(updated).await?;
        Ok(())
    }

    /// Delete the caller's account and everything it owns.
    ///
    /// Both the email and the current password must re-verify. The steps run
    /// in dependency order so that, at any point another reader observes the
    /// store, no comment references a deleted post and no post outlives its
    /// author's other records: comments on own posts go first, then post
    /// photos, then the posts, then the caller's comments elsewhere, then the
    /// avatar, then the user row itself.
    pub async fn delete_account(
        &self,
        identity: Option<&Identity>,
        email: &str,
        password: &str,
    ) -> Result<(), DomainError> {
        let identity = identity.ok_or(DomainError::Unauthenticated)?;
        let user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        if user.email != email {
            return Err(DomainError::Unauthorized);
        }
        let ok = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Upstream(e.to_string()))?;
        if !ok {
            return Err(DomainError::Unauthorized);
        }

        let owned_posts = self.posts.find_by_author(user.id).await?;

        for post in &owned_posts {
            let removed = self.comments.delete_by_post(post.id).await?;
            tracing::debug!(post_id = %post.id, removed, "deleted comments under post");
        }

        for post in &owned_posts {
            self.release(&post.photo).await?;
        }

        for post in &owned_posts {
            match self.posts.delete(post.id).await {
                Ok(()) | Err(RepoError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }
        }

        for comment in self.comments.find_by_author(user.id).await? {
            match self.comments.delete(comment.id).await {
                Ok(()) | Err(RepoError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }
        }

        self.release(&user.avatar).await?;

        match self.users.delete(user.id).await {
            Ok(()) | Err(RepoError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user_id = %user.id, posts = owned_posts.len(), "account deleted");
        Ok(())
    }

    async fn release(&self, image: &ImageRef) -> Result<(), DomainError> {
        let Some(reference) = image.stored_reference() else {
            return Ok(());
        };
        if let Err(err) = self.media.delete(reference).await {
            tracing::error!(%reference, %err, "failed to release image");
            return Err(err.into());
        }
        Ok(())
    }
}

fn validate_person(
    first_name: &str,
    last_name: &str,
    email: &str,
    date_of_birth: NaiveDate,
) -> Result<ProfileDraft, DomainError> {
    let first_name = first_name.trim();
    let last_name = last_name.trim();
    let email = email.trim();

    if first_name.is_empty() {
        return Err(DomainError::validation("first name has to be specified"));
    }
    if last_name.is_empty() {
        return Err(DomainError::validation("last name has to be specified"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("a valid email has to be specified"));
    }
    if !is_adult(date_of_birth) {
        return Err(DomainError::validation("you must be over 18 years old"));
    }

    Ok(ProfileDraft {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        date_of_birth,
    })
}

fn is_adult(date_of_birth: NaiveDate) -> bool {
    Utc::now()
        .date_naive()
        .years_since(date_of_birth)
        .is_some_and(|years| years >= 18)
}
