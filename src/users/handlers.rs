use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{model::PublicUser, services};
use crate::{
    auth::{dto::SignupRequest, extractors::AdminUser, handlers::register_from_request},
    error::AppError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users", get(list_users))
        .route("/users/:id/ban", patch(ban_user))
        .route("/users/:id/unban", patch(unban_user))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = register_from_request(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    info!("admin fetching all users");
    let users = services::list_users(state.users.as_ref()).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn ban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::set_banned(state.users.as_ref(), id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn unban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::set_banned(state.users.as_ref(), id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}
