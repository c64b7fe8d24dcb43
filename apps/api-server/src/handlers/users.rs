//! User handlers: signup, login, profile, updates and account deletion.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::ports::TokenService;
use quill_core::service::{ProfileInput, SignupInput};
use quill_shared::dto::{
    AuthResponse, ChangePasswordRequest, DeleteAccountRequest, LoginRequest,
};

use crate::middleware::auth::Authenticated;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::convert;
use super::forms::{ProfileForm, SignupForm, photo_upload};

/// POST /api/signup
pub async fn signup(
    state: web::Data<AppState>,
    form: MultipartForm<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let avatar = photo_upload(form.avatar)?;

    let input = SignupInput {
        first_name: form.first_name.into_inner(),
        last_name: form.last_name.into_inner(),
        email: form.email.into_inner(),
        date_of_birth: form.dob.into_inner(),
        password: form.password.into_inner(),
        password_confirm: form.password_confirm.into_inner(),
    };

    let user = state.users.signup(input, avatar).await?;
    Ok(HttpResponse::Created().json(convert::user_response(&user)))
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.users.authenticate(&req.email, &req.password).await?;

    let token = token_service
        .generate_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
        user: convert::auth_user_dto(&user),
    }))
}

/// GET /api/auth/user
pub async fn profile(
    state: web::Data<AppState>,
    caller: Authenticated,
) -> AppResult<HttpResponse> {
    let profile = state.users.profile(Some(&caller.0)).await?;
    Ok(HttpResponse::Ok().json(convert::profile_response(&profile)))
}

/// PUT /api/auth/user/basic
pub async fn update_basic(
    state: web::Data<AppState>,
    caller: Authenticated,
    form: MultipartForm<ProfileForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let avatar = photo_upload(form.avatar)?;

    let input = ProfileInput {
        first_name: form.first_name.into_inner(),
        last_name: form.last_name.into_inner(),
        email: form.email.into_inner(),
        date_of_birth: form.dob.into_inner(),
    };

    let user = state.users.update_basic(Some(&caller.0), input, avatar).await?;
    Ok(HttpResponse::Ok().json(convert::user_response(&user)))
}

/// PUT /api/auth/user/password
pub async fn change_password(
    state: web::Data<AppState>,
    caller: Authenticated,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .users
        .change_password(
            Some(&caller.0),
            &req.old_password,
            &req.password,
            &req.password_confirm,
        )
        .await?;

    Ok(HttpResponse::Ok().finish())
}

/// DELETE /api/auth/user
pub async fn delete_account(
    state: web::Data<AppState>,
    caller: Authenticated,
    body: web::Json<DeleteAccountRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .users
        .delete_account(Some(&caller.0), &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Ok().finish())
}
