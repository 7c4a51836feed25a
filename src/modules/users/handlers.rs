use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{NewUser, UpdateUser};
use crate::error::{AppError, AppResult};

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let id = state.users.add(payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = state.users.get_all().await?;

    Ok(Json(users))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    if !state.users.update(id, payload).await? {
        return Err(AppError::NotFound(format!("user {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn registered_trainings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let registrations = state.trainings.registered_trainings(user_id).await?;

    Ok(Json(registrations))
}

pub async fn available_trainings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let trainings = state.trainings.unregistered_trainings(user_id).await?;

    Ok(Json(trainings))
}
