mod modules_service;
mod training_service;
mod users_service;

pub use modules_service::{DefaultModulesService, ModulesService};
pub use training_service::TrainingService;
pub use users_service::UsersService;
