use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{
    Module, ModuleWithTopics, NewRegistration, RegisteredUsers, RegistrationOutcome, Topic,
    TopicUser, Training, TrainingDraft, TrainingNotRegistered, TrainingReport, TrainingUser,
    TrainingWithModules,
};

#[async_trait]
pub trait TrainingRepository: Send + Sync {
    /// Persists the training together with its modules and topics in one
    /// transaction and returns the generated id.
    async fn create_training(&self, draft: TrainingDraft) -> DbResult<Uuid>;

    async fn get_all(&self) -> DbResult<Vec<Training>>;

    /// Training with modules and topics eagerly loaded; `None` for an
    /// unknown id.
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<TrainingWithModules>>;

    /// Deactivates the training. Returns false when it does not exist or is
    /// already inactive, so repeated attempts are safe no-ops.
    async fn suspend(&self, id: Uuid) -> DbResult<bool>;

    /// True iff the training has no enrollment left with completed = false.
    async fn check_for_active_students(&self, id: Uuid) -> DbResult<bool>;

    /// Enrolls the user and creates one progress row per supplied topic,
    /// all-or-nothing.
    async fn create_registration(&self, registration: &NewRegistration)
        -> DbResult<RegistrationOutcome>;

    /// Removes the enrollment and the listed progress rows; true iff at
    /// least one row was deleted.
    async fn delete_registration(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        topic_ids: &[Uuid],
    ) -> DbResult<bool>;

    async fn users_registered_in_training(&self, training_id: Uuid) -> DbResult<RegisteredUsers>;

    async fn reports(&self) -> DbResult<Vec<TrainingReport>>;

    /// Every topic belonging to any module of the training.
    async fn topics(&self, training_id: Uuid) -> DbResult<Vec<Topic>>;

    /// The user's progress rows among the given topics.
    async fn filtered_topic_users(&self, topics: &[Topic], user_id: Uuid)
        -> DbResult<Vec<TopicUser>>;

    /// Trainings the user is not enrolled in.
    async fn unregistered_trainings(&self, user_id: Uuid) -> DbResult<Vec<TrainingNotRegistered>>;

    async fn registered_trainings(&self, user_id: Uuid) -> DbResult<Vec<TrainingUser>>;

    async fn training_user(&self, user_id: Uuid, training_id: Uuid)
        -> DbResult<Option<TrainingUser>>;

    /// Writes the enrollment's completed flag back to the store.
    async fn update_training_user(&self, registration: &TrainingUser) -> DbResult<()>;

    /// Marks the user's progress rows for the given topics as completed;
    /// true iff at least one row was updated.
    async fn complete_topics(&self, user_id: Uuid, topic_ids: &[Uuid]) -> DbResult<bool>;
}

#[derive(Clone)]
pub struct SqliteTrainingRepository {
    pool: SqlitePool,
}

impl SqliteTrainingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EnrolledUserRow {
    name: String,
    completed: bool,
}

#[async_trait]
impl TrainingRepository for SqliteTrainingRepository {
    async fn create_training(&self, draft: TrainingDraft) -> DbResult<Uuid> {
        let mut tx = self.pool.begin().await?;

        let training_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO trainings (id, name, summary, duration, instructor, author, active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
        )
        .bind(training_id)
        .bind(&draft.name)
        .bind(&draft.summary)
        .bind(draft.duration)
        .bind(&draft.instructor)
        .bind(draft.author)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for module in &draft.modules {
            let module_id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO modules (id, training_id, name, position) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(module_id)
            .bind(training_id)
            .bind(&module.name)
            .bind(module.position)
            .execute(&mut *tx)
            .await?;

            for topic in &module.topics {
                sqlx::query(
                    "INSERT INTO topics (id, module_id, name, position) VALUES (?1, ?2, ?3, ?4)",
                )
                .bind(Uuid::new_v4())
                .bind(module_id)
                .bind(&topic.name)
                .bind(topic.position)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(training_id)
    }

    async fn get_all(&self) -> DbResult<Vec<Training>> {
        let trainings = sqlx::query_as::<_, Training>(
            "SELECT id, name, summary, duration, instructor, author, active, created_at, updated_at FROM trainings",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(trainings)
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<TrainingWithModules>> {
        let training = sqlx::query_as::<_, Training>(
            r#"
            SELECT id, name, summary, duration, instructor, author, active, created_at, updated_at
            FROM trainings
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(training) = training else {
            return Ok(None);
        };

        let modules = sqlx::query_as::<_, Module>(
            "SELECT id, training_id, name, position FROM modules WHERE training_id = ?1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let topics = sqlx::query_as::<_, Topic>(
            r#"
            SELECT tp.id, tp.module_id, tp.name, tp.position
            FROM topics tp
            INNER JOIN modules m ON m.id = tp.module_id
            WHERE m.training_id = ?1
            ORDER BY tp.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let modules = modules
            .into_iter()
            .map(|module| {
                let topics = topics
                    .iter()
                    .filter(|topic| topic.module_id == module.id)
                    .cloned()
                    .collect();
                ModuleWithTopics { module, topics }
            })
            .collect();

        Ok(Some(TrainingWithModules { training, modules }))
    }

    async fn suspend(&self, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE trainings SET active = 0, updated_at = ?1 WHERE id = ?2 AND active = 1",
        )
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_for_active_students(&self, id: Uuid) -> DbResult<bool> {
        let active_students = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM training_users WHERE training_id = ?1 AND completed = 0",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(active_students == 0)
    }

    async fn create_registration(
        &self,
        registration: &NewRegistration,
    ) -> DbResult<RegistrationOutcome> {
        let mut tx = self.pool.begin().await?;

        let active = sqlx::query_scalar::<_, bool>("SELECT active FROM trainings WHERE id = ?1")
            .bind(registration.training_id)
            .fetch_optional(&mut *tx)
            .await?;

        if active != Some(true) {
            return Ok(RegistrationOutcome::InactiveTraining);
        }

        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM training_users WHERE user_id = ?1 AND training_id = ?2",
        )
        .bind(registration.user_id)
        .bind(registration.training_id)
        .fetch_one(&mut *tx)
        .await?;

        if enrolled > 0 {
            return Ok(RegistrationOutcome::AlreadyEnrolled);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO training_users (id, training_id, user_id, registration_date, completed)
            VALUES (?1, ?2, ?3, ?4, 0)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(registration.training_id)
        .bind(registration.user_id)
        .bind(OffsetDateTime::now_utc())
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            // A racing registration may beat us to the unique (user, training)
            // constraint; that is still "already enrolled", not a fault.
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return Ok(RegistrationOutcome::AlreadyEnrolled);
                }
            }
            return Err(err.into());
        }

        for topic_id in &registration.topic_ids {
            sqlx::query(
                "INSERT INTO topic_users (id, topic_id, user_id, completed) VALUES (?1, ?2, ?3, 0)",
            )
            .bind(Uuid::new_v4())
            .bind(topic_id)
            .bind(registration.user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(RegistrationOutcome::Registered)
    }

    async fn delete_registration(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        topic_ids: &[Uuid],
    ) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let mut removed =
            sqlx::query("DELETE FROM training_users WHERE user_id = ?1 AND training_id = ?2")
                .bind(user_id)
                .bind(training_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        for topic_id in topic_ids {
            removed += sqlx::query("DELETE FROM topic_users WHERE user_id = ?1 AND topic_id = ?2")
                .bind(user_id)
                .bind(topic_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(removed > 0)
    }

    async fn users_registered_in_training(&self, training_id: Uuid) -> DbResult<RegisteredUsers> {
        let rows = sqlx::query_as::<_, EnrolledUserRow>(
            r#"
            SELECT u.name AS name, tu.completed AS completed
            FROM training_users tu
            INNER JOIN users u ON u.id = tu.user_id
            WHERE tu.training_id = ?1
            "#,
        )
        .bind(training_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = RegisteredUsers::default();
        for row in rows {
            if row.completed {
                result.finished_users.push(row.name);
            } else {
                result.active_users.push(row.name);
            }
        }

        Ok(result)
    }

    async fn reports(&self) -> DbResult<Vec<TrainingReport>> {
        let reports = sqlx::query_as::<_, TrainingReport>(
            r#"
            SELECT t.name AS name,
                   t.duration AS duration,
                   t.active AS active,
                   COALESCE(SUM(CASE WHEN tu.completed = 1 THEN 1 ELSE 0 END), 0) AS total_finished_students
            FROM trainings t
            LEFT JOIN training_users tu ON tu.training_id = t.id
            GROUP BY t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    async fn topics(&self, training_id: Uuid) -> DbResult<Vec<Topic>> {
        let topics = sqlx::query_as::<_, Topic>(
            r#"
            SELECT tp.id, tp.module_id, tp.name, tp.position
            FROM topics tp
            INNER JOIN modules m ON m.id = tp.module_id
            WHERE m.training_id = ?1
            ORDER BY m.position, tp.position
            "#,
        )
        .bind(training_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(topics)
    }

    async fn filtered_topic_users(
        &self,
        topics: &[Topic],
        user_id: Uuid,
    ) -> DbResult<Vec<TopicUser>> {
        if topics.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT id, topic_id, user_id, completed FROM topic_users WHERE user_id = ",
        );
        query.push_bind(user_id);
        query.push(" AND topic_id IN (");
        {
            let mut ids = query.separated(", ");
            for topic in topics {
                ids.push_bind(topic.id);
            }
        }
        query.push(")");

        let topic_users = query
            .build_query_as::<TopicUser>()
            .fetch_all(&self.pool)
            .await?;

        Ok(topic_users)
    }

    async fn unregistered_trainings(&self, user_id: Uuid) -> DbResult<Vec<TrainingNotRegistered>> {
        let trainings = sqlx::query_as::<_, TrainingNotRegistered>(
            r#"
            SELECT id, name, summary, duration, instructor, author, active
            FROM trainings
            WHERE id NOT IN (SELECT training_id FROM training_users WHERE user_id = ?1)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trainings)
    }

    async fn registered_trainings(&self, user_id: Uuid) -> DbResult<Vec<TrainingUser>> {
        let registrations = sqlx::query_as::<_, TrainingUser>(
            "SELECT id, training_id, user_id, registration_date, completed FROM training_users WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    async fn training_user(
        &self,
        user_id: Uuid,
        training_id: Uuid,
    ) -> DbResult<Option<TrainingUser>> {
        let registration = sqlx::query_as::<_, TrainingUser>(
            r#"
            SELECT id, training_id, user_id, registration_date, completed
            FROM training_users
            WHERE user_id = ?1 AND training_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(training_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    async fn update_training_user(&self, registration: &TrainingUser) -> DbResult<()> {
        sqlx::query("UPDATE training_users SET completed = ?1 WHERE id = ?2")
            .bind(registration.completed)
            .bind(registration.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn complete_topics(&self, user_id: Uuid, topic_ids: &[Uuid]) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let mut updated = 0;
        for topic_id in topic_ids {
            updated += sqlx::query(
                "UPDATE topic_users SET completed = 1 WHERE user_id = ?1 AND topic_id = ?2",
            )
            .bind(user_id)
            .bind(topic_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(updated > 0)
    }
}
