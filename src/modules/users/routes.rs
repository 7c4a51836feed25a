use axum::{
    Router,
    routing::{get, put},
};

use super::handlers::{
    available_trainings, create_user, list_users, registered_trainings, update_user,
};
use crate::app_state::AppState;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{user_id}", put(update_user))
        .route("/{user_id}/trainings", get(registered_trainings))
        .route("/{user_id}/trainings/available", get(available_trainings))
}
