use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, StoreError, User};

/// Credential store: point lookups by unique fields and a uniqueness-enforcing insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Must report a unique-constraint violation as [`StoreError::Duplicate`].
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, phone_number, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, phone_number, password_hash, created_at
            FROM users
            WHERE email = $1 OR phone_number = $2
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(phone_number)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, phone_number, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, phone_number, password_hash, created_at
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate(
            db_err
                .constraint()
                .unwrap_or("users unique key")
                .to_string(),
        ),
        other => StoreError::Database(other),
    }
}
