use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginOut, LoginRequest, UserIn, UserOut},
        jwt::{Claims, JwtKeys, TOKEN_TTL},
        password::{hash_password_blocking, verify_dummy_blocking, verify_password_blocking},
        repo::UserStore,
        repo_types::{NewUser, StoreError},
        validation::{validate_login, validate_registration},
    },
    config::JwtConfig,
    error::AuthError,
};

/// Registration: validate, advisory uniqueness pre-check, hash, insert.
///
/// The insert is the authoritative uniqueness check; a concurrent request that
/// slips past the pre-check still ends in [`AuthError::Conflict`].
pub async fn register_user(store: &dyn UserStore, mut input: UserIn) -> Result<UserOut, AuthError> {
    validate_registration(&mut input)?;

    if let Some(existing) = store
        .find_by_email_or_phone(&input.email, &input.phone_number)
        .await?
    {
        warn!(existing_user_id = %existing.id, "email or phone number already registered");
        return Err(AuthError::Conflict);
    }

    let password_hash = hash_password_blocking(input.password).await?;

    let user = store
        .insert(NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            password_hash,
        })
        .await
        .map_err(|e| {
            if let StoreError::Duplicate(key) = &e {
                warn!(constraint = %key, "insert rejected by unique constraint");
            }
            AuthError::from(e)
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user.into())
}

/// Login: validate, look up by email, verify the hash, issue a 24h token.
pub async fn login_user(
    store: &dyn UserStore,
    jwt: &JwtConfig,
    mut input: LoginRequest,
) -> Result<LoginOut, AuthError> {
    validate_login(&mut input)?;

    let Some(user) = store.find_by_email(&input.email).await? else {
        warn!(email = %input.email, "login unknown email");
        verify_dummy_blocking(input.password).await;
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let keys = JwtKeys::try_from(jwt)?;
    let now = OffsetDateTime::now_utc();
    let issued_at = now - Duration::nanoseconds(now.nanosecond().into());
    let claims = Claims::for_user(&user, &keys.issuer, issued_at);
    let token = keys.sign(&claims)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(LoginOut {
        user_id: claims.user_id,
        email: claims.email,
        phone_number: claims.phone_number,
        token,
        issued_at,
        expires_at: issued_at + TOKEN_TTL,
    })
}
