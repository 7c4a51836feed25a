mod training_repository;
mod users_repository;

pub use training_repository::{SqliteTrainingRepository, TrainingRepository};
pub use users_repository::{SqliteUsersRepository, UsersRepository};
