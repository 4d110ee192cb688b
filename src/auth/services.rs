use tracing::{info, warn};

use super::{
    claims::Identity,
    jwt::JwtKeys,
    password::Hasher,
};
use crate::{
    error::{AppError, StoreError},
    users::{
        model::{NewUser, Role, User},
        repo::UserRepo,
    },
};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const BANNED: &str = "You are banned from accessing this system.";
pub const INVALID_TOKEN: &str = "Invalid or expired token.";
pub const UNKNOWN_SUBJECT: &str = "Invalid token: user not found.";
pub const INSUFFICIENT_ROLE: &str = "Insufficient role for this resource.";

/// Input of [`register`]; the email is expected to be normalised already.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Checks an email/password pair.
///
/// The ban flag is only consulted after the password matched, so a banned
/// account with a wrong password gets the same answer as anyone else.
pub async fn validate_credentials(
    users: &dyn UserRepo,
    hasher: &Hasher,
    email: &str,
    password: &str,
) -> Result<Identity, AppError> {
    let Some(user) = users.find_by_email(email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    };

    let ok = hasher
        .verify(password.to_owned(), user.password_hash.clone())
        .await
        .map_err(AppError::internal)?;
    if !ok {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    if user.is_banned {
        warn!(%email, user_id = %user.id, "banned user attempted to log in");
        return Err(AppError::forbidden(BANNED));
    }

    info!(user_id = %user.id, "credentials validated");
    Ok(Identity::from(&user))
}

pub fn issue_token(keys: &JwtKeys, identity: &Identity) -> Result<String, AppError> {
    keys.sign(identity).map_err(AppError::internal)
}

/// Creates a `user`-role account. Duplicate emails are caught by the store.
pub async fn register(
    users: &dyn UserRepo,
    hasher: &Hasher,
    reg: Registration,
) -> Result<User, AppError> {
    let password_hash = hasher.hash(reg.password).await.map_err(AppError::internal)?;
    let user = users
        .insert(NewUser {
            email: reg.email,
            name: reg.name,
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Conflict("Email already registered.".into()),
            other => other.into(),
        })?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Per-request token check. The subject is looked up again so bans and
/// deletions take effect before the token expires.
pub async fn verify_token(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    token: &str,
) -> Result<Identity, AppError> {
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::unauthorized(INVALID_TOKEN)
    })?;

    let Some(user) = users.find_by_id(claims.sub).await? else {
        warn!(user_id = %claims.sub, "token subject no longer exists");
        return Err(AppError::unauthorized(UNKNOWN_SUBJECT));
    };
    if user.is_banned {
        warn!(user_id = %user.id, "banned user presented a token");
        return Err(AppError::unauthorized(BANNED));
    }
    Ok(Identity::from(&user))
}

/// Exact role match; admin does not implicitly satisfy other roles.
pub fn authorize(identity: &Identity, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        warn!(user_id = %identity.id, role = %identity.role, "role check failed");
        Err(AppError::forbidden(INSUFFICIENT_ROLE))
    }
}
