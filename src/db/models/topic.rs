use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub module_id: Uuid,
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTopic {
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug)]
pub struct TopicDraft {
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Serialize)]
pub struct ReadTopic {
    pub id: Uuid,
    pub name: String,
}
