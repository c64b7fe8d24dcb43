//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// Every service operation fails with one of these variants, so the HTTP
/// layer can render a stable status code without entity-specific knowledge.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("authentication required")]
    Unauthenticated,

    #[error("no authorization")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),
}

/// Media store errors.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media upload failed: {0}")]
    Upload(String),

    #[error("media delete failed: {0}")]
    Delete(String),
}

// The services pre-check existence before mutating, so a repository failure
// that leaks through `?` is an infrastructure problem, not a missing row.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            other => DomainError::Upstream(other.to_string()),
        }
    }
}

impl From<MediaError> for DomainError {
    fn from(err: MediaError) -> Self {
        DomainError::Upstream(err.to_string())
    }
}
