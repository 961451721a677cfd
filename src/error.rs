use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::auth::repo_types::StoreError;

const INTERNAL_MESSAGE: &str = "Something went wrong with your request";

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Everything a registration or login request can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),
    #[error("a user with this phone number or email already exists")]
    Conflict,
    /// Unknown email and wrong password both end up here.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("credential store: {0}")]
    Store(StoreError),
    #[error("password hashing: {0}")]
    Hashing(String),
    #[error("token signing: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("configuration: {0}")]
    Configuration(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => AuthError::Conflict,
            other => AuthError::Store(other),
        }
    }
}

/// Failure body: same envelope as success, without `data`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Store(_)
            | AuthError::Hashing(_)
            | AuthError::Signing(_)
            | AuthError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message; never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "Validation failed",
            AuthError::Conflict => "A user with this phone number or email already exists",
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::Signing(_) => "Failed to generate authentication token",
            AuthError::Store(_) | AuthError::Hashing(_) | AuthError::Configuration(_) => {
                INTERNAL_MESSAGE
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }

        let errors = match &self {
            AuthError::Validation(fields) => fields.clone(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.public_message().to_string(),
            errors,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_conflict() {
        let err: AuthError = StoreError::Duplicate("users_email_key".into()).into();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = AuthError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);

        let err = AuthError::Configuration("JWT_SECRET is not set".into());
        assert!(!err.public_message().contains("JWT_SECRET"));
    }

    #[test]
    fn validation_body_lists_fields() {
        let body = ErrorBody {
            status_code: 422,
            message: "Validation failed".into(),
            errors: vec![FieldError::new("email", "must be a valid email address")],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["errors"][0]["field"], "email");

        let body = ErrorBody {
            status_code: 401,
            message: "Invalid credentials".into(),
            errors: Vec::new(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("errors").is_none());
    }
}
