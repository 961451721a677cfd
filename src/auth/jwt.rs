use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{auth::repo_types::User, config::JwtConfig, error::AuthError};

/// Lifetime of every issued token.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// JWT payload issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub phone_number: String,
    pub iss: String,
    pub iat: i64, // issued at (unix timestamp)
    pub exp: i64, // expires at (unix timestamp)
}

impl Claims {
    /// Claims for `user`, valid from `now` (truncated to whole seconds) for [`TOKEN_TTL`].
    pub fn for_user(user: &User, issuer: &str, now: OffsetDateTime) -> Self {
        let iat = now.unix_timestamp();
        Self {
            user_id: user.id,
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            iss: issuer.to_string(),
            iat,
            exp: iat + TOKEN_TTL.whole_seconds(),
        }
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub issuer: String,
}

impl TryFrom<&JwtConfig> for JwtKeys {
    type Error = AuthError;

    fn try_from(cfg: &JwtConfig) -> Result<Self, Self::Error> {
        let Some(secret) = cfg.secret.as_deref() else {
            error!("CRITICAL: JWT_SECRET is not set; refusing to issue tokens");
            return Err(AuthError::Configuration("JWT_SECRET is not set".into()));
        };
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            issuer: cfg.issuer.clone(),
        })
    }
}

impl JwtKeys {
    /// HS256-signs `claims`.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let token = encode(&Header::default(), claims, &self.encoding)?;
        debug!(user_id = %claims.user_id, exp = claims.exp, "jwt signed");
        Ok(token)
    }
}

#[cfg(test)]
pub(crate) fn decode_for_tests(token: &str, secret: &str) -> Claims {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .expect("token should verify")
    .claims
}
