use std::sync::Arc;

use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{
    CompleteTopics, NewRegistration, NewTraining, ReadModule, ReadTopic, ReadTraining,
    RegisteredUsers, RegistrationOutcome, RemoveRegistration, Topic, Training,
    TrainingDraft, TrainingNotRegistered, TrainingReport, TrainingUser, TrainingWithModules,
};
use crate::db::repositories::TrainingRepository;
use crate::services::modules_service::ModulesService;

pub struct TrainingService {
    repository: Arc<dyn TrainingRepository>,
    modules: Arc<dyn ModulesService>,
}

impl TrainingService {
    pub fn new(repository: Arc<dyn TrainingRepository>, modules: Arc<dyn ModulesService>) -> Self {
        Self {
            repository,
            modules,
        }
    }

    /// Copies the scalar fields into a draft, lets the modules collaborator
    /// order the nested modules and topics, and persists the aggregate.
    pub async fn create_training(&self, training: NewTraining) -> DbResult<Uuid> {
        let draft = TrainingDraft {
            name: training.name,
            summary: training.summary,
            duration: training.duration,
            instructor: training.instructor,
            author: training.author,
            modules: self.modules.assemble(training.modules),
        };

        self.repository.create_training(draft).await
    }

    pub async fn get_all(&self) -> DbResult<Vec<Training>> {
        self.repository.get_all().await
    }

    /// `None` stays `None`: no read DTO is built for a missing training.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<ReadTraining>> {
        let training = self.repository.get_by_id(id).await?;
        Ok(training.map(to_read_training))
    }

    /// A training may be suspended if and only if every enrolled student has
    /// completed it. When students are still active no write is attempted.
    pub async fn suspend(&self, id: Uuid) -> DbResult<bool> {
        if !self.repository.check_for_active_students(id).await? {
            return Ok(false);
        }

        self.repository.suspend(id).await
    }

    pub async fn users_registered_in_training(&self, id: Uuid) -> DbResult<RegisteredUsers> {
        self.repository.users_registered_in_training(id).await
    }

    /// Reports ordered by finished-student count, busiest training first.
    pub async fn reports(&self) -> DbResult<Vec<TrainingReport>> {
        let mut reports = self.repository.reports().await?;
        reports.sort_by(|a, b| b.total_finished_students.cmp(&a.total_finished_students));
        Ok(reports)
    }

    pub async fn register(&self, registration: NewRegistration) -> DbResult<RegistrationOutcome> {
        self.repository.create_registration(&registration).await
    }

    pub async fn remove_registration(&self, removal: RemoveRegistration) -> DbResult<bool> {
        self.repository
            .delete_registration(removal.user_id, removal.training_id, &removal.topic_ids)
            .await
    }

    pub async fn registered_trainings(&self, user_id: Uuid) -> DbResult<Vec<TrainingUser>> {
        self.repository.registered_trainings(user_id).await
    }

    pub async fn unregistered_trainings(
        &self,
        user_id: Uuid,
    ) -> DbResult<Vec<TrainingNotRegistered>> {
        self.repository.unregistered_trainings(user_id).await
    }

    pub async fn topics(&self, training_id: Uuid) -> DbResult<Vec<Topic>> {
        self.repository.topics(training_id).await
    }

    pub async fn complete_topics(&self, progress: CompleteTopics) -> DbResult<bool> {
        self.repository
            .complete_topics(progress.user_id, &progress.topic_ids)
            .await
    }

    /// Closes out an enrollment once the user has finished every topic they
    /// registered for. Absent enrollments report false; an enrollment that is
    /// already completed stays completed.
    pub async fn conclude_registration(&self, user_id: Uuid, training_id: Uuid) -> DbResult<bool> {
        let Some(mut registration) = self.repository.training_user(user_id, training_id).await?
        else {
            return Ok(false);
        };

        if registration.completed {
            return Ok(true);
        }

        let topics = self.repository.topics(training_id).await?;
        let progress = self.repository.filtered_topic_users(&topics, user_id).await?;
        if progress.iter().any(|topic_user| !topic_user.completed) {
            return Ok(false);
        }

        registration.completed = true;
        self.repository.update_training_user(&registration).await?;
        Ok(true)
    }
}

fn to_read_training(aggregate: TrainingWithModules) -> ReadTraining {
    let TrainingWithModules { training, modules } = aggregate;

    ReadTraining {
        id: training.id,
        name: training.name,
        summary: training.summary,
        duration: training.duration,
        instructor: training.instructor,
        author: training.author,
        active: training.active,
        modules: modules
            .into_iter()
            .map(|entry| ReadModule {
                id: entry.module.id,
                name: entry.module.name,
                topics: entry
                    .topics
                    .into_iter()
                    .map(|topic| ReadTopic {
                        id: topic.id,
                        name: topic.name,
                    })
                    .collect(),
            })
            .collect(),
    }
}
