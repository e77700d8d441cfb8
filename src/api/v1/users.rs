//! User endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CreateUserBody, UpdateUserBody, UserResponse};
use crate::domain::UserId;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

fn parse_id(id: u64) -> Result<UserId, ApiError> {
    UserId::new(id).map_err(ApiError::from)
}

/// GET /v1/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("listing all users");

    let users = state.user_service.list().await.map_err(ApiError::from)?;

    Ok(Json(users.iter().map(UserResponse::from_domain).collect()))
}

/// GET /v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id, "reading user");

    let id = parse_id(id)?;
    let user = state
        .user_service
        .get(id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", id)))?;

    Ok(Json(UserResponse::from_domain(&user)))
}

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(name = %body.name, "creating user");

    let user = state
        .user_service
        .create(CreateUserRequest {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_domain(&user))))
}

/// PUT /v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id, "updating user");

    let id = parse_id(id)?;
    let user = state
        .user_service
        .update(
            id,
            UpdateUserRequest {
                name: body.name,
                email: body.email,
                password: body.password,
            },
        )
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", id)))?;

    Ok(Json(UserResponse::from_domain(&user)))
}

/// DELETE /v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    debug!(id, "deleting user");

    let id = parse_id(id)?;
    let deleted = state
        .user_service
        .delete(id)
        .await
        .map_err(ApiError::from)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("user {} not found", id)))
    }
}
