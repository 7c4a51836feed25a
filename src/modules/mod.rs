pub mod trainings;
pub mod users;
