//! Identity extractors.
//!
//! Two verification modes, per endpoint needs:
//!
//! - [`Authenticated`] is strict: any missing, malformed or invalid
//!   credential fails the request with 401. Every mutation route uses it.
//! - [`MaybeAuthenticated`] is best-effort: a bad credential silently
//!   resolves to `None`, so the handler can fall back to anonymous behavior
//!   (the single-post read uses it so an author can see their own draft).
//!
//! Neither consults the entity store; whether the referenced user still
//! exists is the services' concern.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use quill_core::ports::{AuthError, Identity, TokenService};
use quill_shared::ErrorResponse;

/// Strict identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(caller: Authenticated) -> impl Responder {
///     format!("Hello, user {}!", caller.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl std::ops::Deref for Authenticated {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::InvalidCredentials => ErrorResponse::unauthorized(),
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn resolve(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    // Get token service from app data
    let token_service = req
        .app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthenticationError(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ))
        })?;

    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthenticationError(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;

    // Parse "Bearer <token>"
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError(AuthError::InvalidToken("Expected Bearer token".to_string()))
    })?;

    // Validate token; fails closed on any defect.
    let claims = token_service
        .validate_token(token)
        .map_err(AuthenticationError)?;

    Ok(claims.into())
}

impl FromRequest for Authenticated {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(Authenticated))
    }
}

/// Best-effort identity extractor - never fails the request.
pub struct MaybeAuthenticated(pub Option<Identity>);

impl MaybeAuthenticated {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl FromRequest for MaybeAuthenticated {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeAuthenticated(resolve(req).ok())))
    }
}
