use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub email: String,
    pub cpf: i64,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub age: i64,
    #[validate(email)]
    pub email: String,
    pub cpf: i64,
    pub password: SecretBox<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub age: Option<i64>,
    #[validate(email)]
    pub email: Option<String>,
    pub cpf: Option<i64>,
}
