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
use crate::db::models::{CompleteTopics, NewRegistration, NewTraining, RegistrationOutcome, RemoveRegistration};
use crate::error::{AppError, AppResult};

pub async fn create_training(
    State(state): State<AppState>,
    Json(payload): Json<NewTraining>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let id = state.trainings.create_training(payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn list_trainings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let trainings = state.trainings.get_all().await?;

    Ok(Json(trainings))
}

pub async fn get_training(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let training = state
        .trainings
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("training {id} not found")))?;

    Ok(Json(training))
}

pub async fn suspend_training(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.trainings.suspend(id).await? {
        return Err(AppError::Conflict(
            "training has active students or is not active".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn registered_users(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let users = state.trainings.users_registered_in_training(id).await?;

    Ok(Json(users))
}

pub async fn training_reports(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let reports = state.trainings.reports().await?;

    Ok(Json(reports))
}

pub async fn training_topics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let topics = state.trainings.topics(id).await?;

    Ok(Json(topics))
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<NewRegistration>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    match state.trainings.register(payload).await? {
        RegistrationOutcome::Registered => Ok(StatusCode::CREATED),
        RegistrationOutcome::AlreadyEnrolled => Err(AppError::Conflict(
            "user is already registered in this training".to_string(),
        )),
        RegistrationOutcome::InactiveTraining => Err(AppError::BadRequest(
            "training is not active".to_string(),
        )),
    }
}

pub async fn remove_registration(
    State(state): State<AppState>,
    Json(payload): Json<RemoveRegistration>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    if !state.trainings.remove_registration(payload).await? {
        return Err(AppError::NotFound("registration not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_topics(
    State(state): State<AppState>,
    Json(payload): Json<CompleteTopics>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    if !state.trainings.complete_topics(payload).await? {
        return Err(AppError::NotFound(
            "no matching topic progress to update".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn conclude_registration(
    State(state): State<AppState>,
    Path((training_id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    if !state
        .trainings
        .conclude_registration(user_id, training_id)
        .await?
    {
        return Err(AppError::Conflict(
            "registration is missing or has unfinished topics".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
