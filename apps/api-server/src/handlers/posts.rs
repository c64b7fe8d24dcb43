//! Post handlers.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::service::PostInput;
use quill_shared::dto::DeletePostRequest;

use crate::middleware::auth::{Authenticated, MaybeAuthenticated};
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::convert;
use super::forms::{PostForm, photo_upload};

fn post_input(form: PostForm) -> (PostInput, Option<actix_multipart::form::bytes::Bytes>) {
    (
        PostInput {
            title: form.title.into_inner(),
            content: form.content.into_inner(),
            description: form.description.into_inner(),
            published: form.published.into_inner(),
        },
        form.photo,
    )
}

/// POST /api/auth/posts
pub async fn create(
    state: web::Data<AppState>,
    caller: Authenticated,
    form: MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let (input, photo_field) = post_input(form.into_inner());
    let photo = photo_upload(photo_field)?;

    let post = state.posts.create(Some(&caller.0), input, photo).await?;
    Ok(HttpResponse::Created().json(convert::created_post_response(&post)))
}

/// GET /api/posts
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let views = state.posts.list_published().await?;
    let body: Vec<_> = views.iter().map(convert::post_summary).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{postid}
///
/// Best-effort identity: the author of an unpublished post may still read
/// it; everyone else gets 401 for a draft and 404 for a missing post.
pub async fn get_published(
    state: web::Data<AppState>,
    viewer: MaybeAuthenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state.posts.get(path.into_inner(), viewer.identity()).await?;
    Ok(HttpResponse::Ok().json(convert::post_response(&view)))
}

/// GET /api/auth/posts/{postid}
pub async fn get_own_view(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state.posts.get(path.into_inner(), Some(&caller.0)).await?;
    Ok(HttpResponse::Ok().json(convert::post_response(&view)))
}

/// GET /api/auth/posts/author
pub async fn list_by_author(
    state: web::Data<AppState>,
    caller: Authenticated,
) -> AppResult<HttpResponse> {
    let views = state.posts.list_by_author(Some(&caller.0)).await?;
    let body: Vec<_> = views.iter().map(convert::post_summary).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/auth/posts/{postid}/edit
pub async fn get_for_edit(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .get_for_edit(Some(&caller.0), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(convert::post_response(&view)))
}

/// PUT /api/auth/posts/{postid}
pub async fn update(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    form: MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let (input, photo_field) = post_input(form.into_inner());
    let photo = photo_upload(photo_field)?;

    let post = state
        .posts
        .update(Some(&caller.0), path.into_inner(), input, photo)
        .await?;
    Ok(HttpResponse::Ok().json(convert::created_post_response(&post)))
}

/// DELETE /api/auth/posts/{postid}
pub async fn delete(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    body: web::Json<DeletePostRequest>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(Some(&caller.0), path.into_inner(), &body.confirmation)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
