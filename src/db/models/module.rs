use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

use super::topic::{NewTopic, ReadTopic, Topic, TopicDraft};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Module {
    pub id: Uuid,
    pub training_id: Uuid,
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewModule {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(nested)]
    pub topics: Vec<NewTopic>,
}

#[derive(Debug)]
pub struct ModuleDraft {
    pub name: String,
    pub position: i64,
    pub topics: Vec<TopicDraft>,
}

#[derive(Debug)]
pub struct ModuleWithTopics {
    pub module: Module,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Serialize)]
pub struct ReadModule {
    pub id: Uuid,
    pub name: String,
    pub topics: Vec<ReadTopic>,
}
