use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config;
use crate::db::repositories::{SqliteTrainingRepository, SqliteUsersRepository};
use crate::services::{DefaultModulesService, TrainingService, UsersService};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub env: config::Config,
    pub trainings: Arc<TrainingService>,
    pub users: Arc<UsersService>,
}

impl AppState {
    /// Wires the repositories and services on top of the pool. All
    /// dependencies are injected through constructors; nothing lives in
    /// process-wide statics.
    pub fn new(db: SqlitePool, env: config::Config) -> Self {
        let training_repository = Arc::new(SqliteTrainingRepository::new(db.clone()));
        let users_repository = Arc::new(SqliteUsersRepository::new(db.clone()));

        let trainings = Arc::new(TrainingService::new(
            training_repository,
            Arc::new(DefaultModulesService),
        ));
        let users = Arc::new(UsersService::new(users_repository));

        Self {
            db,
            env,
            trainings,
            users,
        }
    }
}
