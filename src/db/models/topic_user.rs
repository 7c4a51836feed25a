use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TopicUser {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub user_id: Uuid,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteTopics {
    pub user_id: Uuid,
    pub topic_ids: Vec<Uuid>,
}
