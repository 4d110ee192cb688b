use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{
    claims::Identity,
    jwt::JwtKeys,
    services::{authorize, verify_token},
};
use crate::{error::AppError, state::AppState, users::model::Role};

/// Bearer-authenticated caller, re-resolved against the user store.
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header."))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header."))?;

        let keys = JwtKeys::from_ref(state);
        let identity = verify_token(state.users.as_ref(), &keys, token.trim()).await?;
        Ok(AuthUser(identity))
    }
}

/// Caller whose role is exactly `admin`.
pub struct AdminUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        authorize(&identity, &[Role::Admin])?;
        Ok(AdminUser(identity))
    }
}
