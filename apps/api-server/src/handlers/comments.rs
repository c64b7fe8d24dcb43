//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::CommentRequest;

use crate::middleware::auth::Authenticated;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::convert;

/// GET /api/posts/{postid}/comments
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list_for_post(path.into_inner()).await?;
    let body: Vec<_> = comments.iter().map(convert::comment_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/auth/posts/{postid}/comments
pub async fn create(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(Some(&caller.0), path.into_inner(), &body.content)
        .await?;
    Ok(HttpResponse::Created().json(convert::comment_response(&comment)))
}

/// PUT /api/auth/posts/{postid}/comments/{commentid}
pub async fn update(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(Some(&caller.0), post_id, comment_id, &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(convert::comment_response(&comment)))
}

/// DELETE /api/auth/posts/{postid}/comments/{commentid}
pub async fn delete(
    state: web::Data<AppState>,
    caller: Authenticated,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .delete(Some(&caller.0), post_id, comment_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
