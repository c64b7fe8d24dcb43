use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageRef;

/// User entity - represents an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    /// Argon2 digest. Never serialized into any response.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    pub avatar: ImageRef,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and creation timestamp.
    pub fn new(draft: UserDraft, password_hash: String, avatar: ImageRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            date_of_birth: draft.date_of_birth,
            password_hash,
            avatar,
            created_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated signup input, before hashing and avatar resolution.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// Basic-information update: everything but the password.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}
