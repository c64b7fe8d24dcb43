//! Data Transfer Objects - request/response types for the API.
//!
//! Multipart request shapes (signup, post create/update, avatar change) live
//! in the server crate next to the multipart extractor; everything that goes
//! over the wire as JSON is here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to create or edit a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// Request to delete a post: the caller repeats the exact title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePostRequest {
    pub confirmation: String,
}

/// Request to change the caller's password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request to delete the caller's whole account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    pub email: String,
    pub password: String,
}

/// An image as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDto {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    pub is_default: bool,
}

/// Response containing authentication tokens plus the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthUserDto,
}

/// The slice of the user a client needs right after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: String,
}

/// A user's own full details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub avatar: ImageDto,
    pub created_at: DateTime<Utc>,
}

/// Profile view: the user plus authorship counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub post_count: u64,
    pub comment_count: u64,
}

/// A full post, served from single-post reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: String,
    pub photo: ImageDto,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    pub comment_count: u64,
}

/// List entry: everything but the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryDto {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub photo: ImageDto,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    pub comment_count: u64,
}

/// A comment as served to readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}
