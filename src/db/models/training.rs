use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

use super::module::{ModuleDraft, ModuleWithTopics, NewModule, ReadModule};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Training {
    pub id: Uuid,
    pub name: String,
    pub summary: String,
    pub duration: i64,
    pub instructor: String,
    pub author: Uuid,
    pub active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTraining {
    #[validate(length(min = 1, message = "Name must be at least 1 character long"))]
    pub name: String,
    pub summary: String,
    #[validate(range(min = 1))]
    pub duration: i64,
    #[validate(length(min = 1))]
    pub instructor: String,
    pub author: Uuid,
    #[validate(nested)]
    pub modules: Vec<NewModule>,
}

/// Aggregate shape handed to the repository: scalar fields copied from the
/// inbound payload, modules already ordered by the modules collaborator.
#[derive(Debug)]
pub struct TrainingDraft {
    pub name: String,
    pub summary: String,
    pub duration: i64,
    pub instructor: String,
    pub author: Uuid,
    pub modules: Vec<ModuleDraft>,
}

/// Eager-load shape for a single training: the row plus its modules and
/// their topics, in position order.
#[derive(Debug)]
pub struct TrainingWithModules {
    pub training: Training,
    pub modules: Vec<ModuleWithTopics>,
}

#[derive(Debug, Serialize)]
pub struct ReadTraining {
    pub id: Uuid,
    pub name: String,
    pub summary: String,
    pub duration: i64,
    pub instructor: String,
    pub author: Uuid,
    pub active: bool,
    pub modules: Vec<ReadModule>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TrainingReport {
    pub name: String,
    pub duration: i64,
    pub active: bool,
    pub total_finished_students: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TrainingNotRegistered {
    pub id: Uuid,
    pub name: String,
    pub summary: String,
    pub duration: i64,
    pub instructor: String,
    pub author: Uuid,
    pub active: bool,
}
