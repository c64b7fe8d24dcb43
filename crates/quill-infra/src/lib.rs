//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database repositories, the JWT/Argon2 auth
//! services and the media store adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - In-memory repositories and media store only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `s3` - S3 object storage for images

pub mod auth;
pub mod database;
pub mod media;

// Re-exports - always available
pub use auth::{Argon2PasswordService, JwtTokenService};
pub use database::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use media::InMemoryMediaStore;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "s3")]
pub use media::{S3Config, S3MediaStore};
