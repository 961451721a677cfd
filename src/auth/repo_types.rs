use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                     // server-assigned
    pub first_name: String,
    pub last_name: String,
    pub email: String,                // unique, lower-cased
    pub phone_number: String,         // unique, 10 chars
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime,
}

/// Row to insert; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// Failure of the credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint (email or phone number) rejected the write.
    #[error("unique constraint violated: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
