//! Multipart request shapes and upload validation.
//!
//! The signup, profile and post endpoints take `multipart/form-data` so an
//! image can ride along with the text fields.

use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use chrono::NaiveDate;

use quill_core::service::PhotoUpload;

use crate::middleware::error::AppError;

/// Hard cap on accepted image payloads.
const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Post create/update form.
#[derive(Debug, MultipartForm)]
pub struct PostForm {
    pub title: Text<String>,
    pub content: Text<String>,
    pub description: Text<String>,
    pub published: Text<bool>,
    #[multipart(limit = "10MB")]
    pub photo: Option<Bytes>,
}

/// Signup form.
#[derive(Debug, MultipartForm)]
pub struct SignupForm {
    pub first_name: Text<String>,
    pub last_name: Text<String>,
    pub email: Text<String>,
    pub dob: Text<NaiveDate>,
    pub password: Text<String>,
    pub password_confirm: Text<String>,
    #[multipart(limit = "10MB")]
    pub avatar: Option<Bytes>,
}

/// Basic-information update form.
#[derive(Debug, MultipartForm)]
pub struct ProfileForm {
    pub first_name: Text<String>,
    pub last_name: Text<String>,
    pub email: Text<String>,
    pub dob: Text<NaiveDate>,
    #[multipart(limit = "10MB")]
    pub avatar: Option<Bytes>,
}

/// Turn an optional multipart file field into a validated upload.
///
/// Only PNG and JPEG are accepted, capped at 2 MiB; an oversized image is
/// 413 so clients can tell "too big" from "wrong shape". The extractor's own
/// limit above is deliberately looser, so this check is the one that fires.
pub fn photo_upload(field: Option<Bytes>) -> Result<Option<PhotoUpload>, AppError> {
    let Some(bytes) = field else {
        return Ok(None);
    };

    let content_type = bytes
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();

    if content_type != "image/png" && content_type != "image/jpeg" {
        return Err(AppError::BadRequest(
            "only png and jpeg images are accepted".to_string(),
        ));
    }

    if bytes.data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::PayloadTooLarge(
            "image exceeds the 2MB limit".to_string(),
        ));
    }

    Ok(Some(PhotoUpload {
        bytes: bytes.data.to_vec(),
        original_filename: bytes
            .file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string()),
        content_type,
    }))
}
