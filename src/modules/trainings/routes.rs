use axum::{
    Router,
    routing::{delete, get, put},
};

use super::handlers::{
    complete_topics, conclude_registration, create_training, get_training, list_trainings,
    register_user, registered_users, remove_registration, suspend_training, training_reports,
    training_topics,
};
use crate::app_state::AppState;

pub fn trainings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trainings).post(create_training))
        .route("/reports", get(training_reports))
        .route("/registrations", delete(remove_registration).post(register_user))
        .route("/registrations/topics", put(complete_topics))
        .route("/{training_id}", get(get_training))
        .route("/{training_id}/suspend", put(suspend_training))
        .route("/{training_id}/users", get(registered_users))
        .route("/{training_id}/topics", get(training_topics))
        .route(
            "/{training_id}/registrations/{user_id}",
            put(conclude_registration),
        )
}
