use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TrainingUser {
    pub id: Uuid,
    pub training_id: Uuid,
    pub user_id: Uuid,
    pub registration_date: OffsetDateTime,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewRegistration {
    pub training_id: Uuid,
    pub user_id: Uuid,
    pub topic_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RemoveRegistration {
    pub training_id: Uuid,
    pub user_id: Uuid,
    pub topic_ids: Vec<Uuid>,
}

/// The three possible answers to a registration attempt. A training that does
/// not exist is, for registration purposes, not active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    AlreadyEnrolled,
    InactiveTraining,
}

#[derive(Debug, Default, Serialize)]
pub struct RegisteredUsers {
    pub active_users: Vec<String>,
    pub finished_users: Vec<String>,
}
