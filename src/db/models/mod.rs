mod module;
mod topic;
mod topic_user;
mod training;
mod training_user;
mod user;

pub use module::*;
pub use topic::*;
pub use topic_user::*;
pub use training::*;
pub use training_user::*;
pub use user::*;
