use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        services::{self, Registration},
    },
    error::AppError,
    extract::ApiJson,
    state::AppState,
    users::model::PublicUser,
    validation::Validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.normalize();
    payload.validated()?;

    let identity = services::validate_credentials(
        state.users.as_ref(),
        &state.hasher,
        &payload.email,
        &payload.password,
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = services::issue_token(&keys, &identity)?;

    info!(user_id = %identity.id, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = register_from_request(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Shared body of `/auth/signup` and `/users/register`.
pub(crate) async fn register_from_request(
    state: &AppState,
    mut payload: SignupRequest,
) -> Result<PublicUser, AppError> {
    payload.normalize();
    payload.validated()?;

    let user = services::register(
        state.users.as_ref(),
        &state.hasher,
        Registration {
            email: payload.email,
            name: payload.name,
            password: payload.password,
        },
    )
    .await?;
    Ok(user.into())
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| AppError::unauthorized(services::UNKNOWN_SUBJECT))?;
    Ok(Json(user.into()))
}
