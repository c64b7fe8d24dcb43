//! Mapping from domain types to response DTOs.

use quill_core::domain::{Comment, ImageRef, Post, User};
use quill_core::service::{PostView, UserProfile};
use quill_shared::dto::{
    AuthUserDto, CommentResponse, ImageDto, PostResponse, PostSummaryDto, ProfileResponse,
    UserResponse,
};

pub fn image_dto(image: &ImageRef) -> ImageDto {
    match image {
        ImageRef::Default { url } => ImageDto {
            url: url.clone(),
            original_filename: None,
            is_default: true,
        },
        ImageRef::Stored {
            original_filename,
            url,
            ..
        } => ImageDto {
            url: url.clone(),
            original_filename: Some(original_filename.clone()),
            is_default: false,
        },
    }
}

pub fn auth_user_dto(user: &User) -> AuthUserDto {
    AuthUserDto {
        id: user.id,
        full_name: user.full_name(),
        avatar_url: user.avatar.url().to_string(),
    }
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        date_of_birth: user.date_of_birth,
        avatar: image_dto(&user.avatar),
        created_at: user.created_at,
    }
}

pub fn profile_response(profile: &UserProfile) -> ProfileResponse {
    ProfileResponse {
        user: user_response(&profile.user),
        post_count: profile.post_count,
        comment_count: profile.comment_count,
    }
}

pub fn post_response(view: &PostView) -> PostResponse {
    let post = &view.post;
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        content: post.content.clone(),
        description: post.description.clone(),
        photo: image_dto(&post.photo),
        published: post.published,
        created_at: post.created_at,
        edited_at: post.edited_at,
        comment_count: view.comment_count,
    }
}

/// Response for a freshly written post; the comment count is not recomputed.
pub fn created_post_response(post: &Post) -> PostResponse {
    post_response(&PostView {
        post: post.clone(),
        comment_count: 0,
    })
}

pub fn post_summary(view: &PostView) -> PostSummaryDto {
    let post = &view.post;
    PostSummaryDto {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        description: post.description.clone(),
        photo: image_dto(&post.photo),
        published: post.published,
        created_at: post.created_at,
        edited_at: post.edited_at,
        comment_count: view.comment_count,
    }
}

pub fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        content: comment.content.clone(),
        created_at: comment.created_at,
        edited_at: comment.edited_at,
    }
}
