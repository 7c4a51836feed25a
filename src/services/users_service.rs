use std::sync::Arc;

use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{NewUser, UpdateUser, User};
use crate::db::repositories::UsersRepository;

pub struct UsersService {
    repository: Arc<dyn UsersRepository>,
}

impl UsersService {
    pub fn new(repository: Arc<dyn UsersRepository>) -> Self {
        Self { repository }
    }

    pub async fn add(&self, user: NewUser) -> DbResult<Uuid> {
        self.repository.add(&user).await
    }

    pub async fn update(&self, id: Uuid, update: UpdateUser) -> DbResult<bool> {
        self.repository.update(id, &update).await
    }

    pub async fn get_all(&self) -> DbResult<Vec<User>> {
        self.repository.get_all().await
    }

    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.repository.get_by_email(email).await
    }
}
