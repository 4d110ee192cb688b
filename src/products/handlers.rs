use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateProductRequest, UpdateProductRequest},
    model::Product,
    services,
};
use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::AppError,
    extract::{ApiJson, ApiPath},
    state::AppState,
    validation::Validate,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/products/approved", get(list_approved))
        .route("/products/my-products", get(list_mine))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", patch(update_product).delete(delete_product))
        .route("/products/:id/approve", patch(approve_product))
        .route("/products/:id/disapprove", patch(disapprove_product))
}

#[instrument(skip(state))]
pub async fn list_approved(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(services::list_approved(state.products.as_ref()).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(services::list_owned(state.products.as_ref(), user.id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    payload.validated()?;
    let product = services::create(state.products.as_ref(), payload.into_new(user.id)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    payload.validated()?;
    let product = services::update(state.products.as_ref(), id, user.id, payload.into()).await?;
    Ok(Json(product))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete(state.products.as_ref(), id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn approve_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(services::set_approval(state.products.as_ref(), id, true).await?))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn disapprove_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(services::set_approval(state.products.as_ref(), id, false).await?))
}
