use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::dto::{CreateTask, UpdateTask};
use super::service;
use crate::error::ApiError;
use crate::routes::middleware_auth::JwtUser;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    JwtUser(user_id): JwtUser,
    Json(body): Json<CreateTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = service::create_task(&state.db, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(
    State(state): State<AppState>,
    JwtUser(user_id): JwtUser,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = service::list_tasks(&state.db, user_id).await?;
    Ok(Json(tasks))
}

pub async fn update(
    State(state): State<AppState>,
    JwtUser(user_id): JwtUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = service::update_task(&state.db, user_id, id, body).await?;
    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    JwtUser(user_id): JwtUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service::delete_task(&state.db, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
