//! Store-level tests for the training repository, run against a fresh
//! in-memory database per test.

mod common;

use uuid::Uuid;

use courses_backend::db::models::{NewRegistration, RegistrationOutcome, TrainingUser};
use courses_backend::db::repositories::{SqliteTrainingRepository, TrainingRepository};

use common::{sample_training, seed_user, test_pool};

async fn registered_user(
    repository: &SqliteTrainingRepository,
    pool: &sqlx::SqlitePool,
    name: &str,
    email: &str,
    training_id: Uuid,
) -> (Uuid, Vec<Uuid>) {
    let user_id = seed_user(pool, name, email).await;
    let topics = repository.topics(training_id).await.expect("load topics");
    let topic_ids: Vec<Uuid> = topics.iter().map(|topic| topic.id).collect();

    let outcome = repository
        .create_registration(&NewRegistration {
            training_id,
            user_id,
            topic_ids: topic_ids.clone(),
        })
        .await
        .expect("register");
    assert_eq!(outcome, RegistrationOutcome::Registered);

    (user_id, topic_ids)
}

async fn finish_enrollment(repository: &SqliteTrainingRepository, user_id: Uuid, training_id: Uuid) {
    let mut registration = repository
        .training_user(user_id, training_id)
        .await
        .expect("load enrollment")
        .expect("enrollment exists");
    registration.completed = true;
    repository
        .update_training_user(&registration)
        .await
        .expect("update enrollment");
}

#[tokio::test]
async fn create_training_persists_the_whole_aggregate() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");

    let aggregate = repository
        .get_by_id(id)
        .await
        .expect("load training")
        .expect("training exists");

    assert_eq!(aggregate.training.name, "Rust");
    assert!(aggregate.training.active);
    assert_eq!(aggregate.modules.len(), 2);
    assert_eq!(aggregate.modules[0].module.name, "Fundamentals");
    assert_eq!(aggregate.modules[0].topics.len(), 2);
    assert_eq!(aggregate.modules[1].topics.len(), 1);

    let topic_names: Vec<&str> = aggregate.modules[0]
        .topics
        .iter()
        .map(|topic| topic.name.as_str())
        .collect();
    assert_eq!(topic_names, vec!["Setup", "Syntax"]);
}

#[tokio::test]
async fn get_all_returns_every_training() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    repository
        .create_training(sample_training("Go"))
        .await
        .expect("create training");

    let trainings = repository.get_all().await.expect("list trainings");
    assert_eq!(trainings.len(), 2);
}

#[tokio::test]
async fn get_by_id_returns_none_for_unknown_training() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let found = repository
        .get_by_id(Uuid::new_v4())
        .await
        .expect("query training");
    assert!(found.is_none());
}

#[tokio::test]
async fn suspend_deactivates_an_active_training() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");

    assert!(repository.suspend(id).await.expect("suspend"));

    let aggregate = repository
        .get_by_id(id)
        .await
        .expect("load training")
        .expect("training exists");
    assert!(!aggregate.training.active);
}

#[tokio::test]
async fn suspend_is_a_noop_the_second_time() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");

    assert!(repository.suspend(id).await.expect("suspend"));
    assert!(!repository.suspend(id).await.expect("suspend again"));
    assert!(!repository.suspend(Uuid::new_v4()).await.expect("suspend unknown"));
}

#[tokio::test]
async fn registration_creates_enrollment_and_progress_rows() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let (user_id, topic_ids) =
        registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;

    let registrations = repository
        .registered_trainings(user_id)
        .await
        .expect("list registrations");
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].training_id, training_id);
    assert!(!registrations[0].completed);

    let topics = repository.topics(training_id).await.expect("load topics");
    let progress = repository
        .filtered_topic_users(&topics, user_id)
        .await
        .expect("load progress");
    assert_eq!(progress.len(), topic_ids.len());
    assert!(progress.iter().all(|row| !row.completed));
}

#[tokio::test]
async fn registration_is_rejected_for_inactive_or_unknown_training() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    repository.suspend(training_id).await.expect("suspend");

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;

    let suspended = repository
        .create_registration(&NewRegistration {
            training_id,
            user_id,
            topic_ids: Vec::new(),
        })
        .await
        .expect("attempt registration");
    assert_eq!(suspended, RegistrationOutcome::InactiveTraining);

    let unknown = repository
        .create_registration(&NewRegistration {
            training_id: Uuid::new_v4(),
            user_id,
            topic_ids: Vec::new(),
        })
        .await
        .expect("attempt registration");
    assert_eq!(unknown, RegistrationOutcome::InactiveTraining);

    // Neither attempt left an enrollment behind.
    let registrations = repository
        .registered_trainings(user_id)
        .await
        .expect("list registrations");
    assert!(registrations.is_empty());
}

#[tokio::test]
async fn duplicate_registration_reports_already_enrolled() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let (user_id, topic_ids) =
        registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;

    let again = repository
        .create_registration(&NewRegistration {
            training_id,
            user_id,
            topic_ids,
        })
        .await
        .expect("attempt registration");
    assert_eq!(again, RegistrationOutcome::AlreadyEnrolled);

    let registrations = repository
        .registered_trainings(user_id)
        .await
        .expect("list registrations");
    assert_eq!(registrations.len(), 1);
}

#[tokio::test]
async fn active_student_check_tracks_completion() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");

    // No enrollments yet, nobody is mid-training.
    assert!(repository
        .check_for_active_students(training_id)
        .await
        .expect("check"));

    let (user_id, _) = registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;
    assert!(!repository
        .check_for_active_students(training_id)
        .await
        .expect("check"));

    finish_enrollment(&repository, user_id, training_id).await;
    assert!(repository
        .check_for_active_students(training_id)
        .await
        .expect("check"));
}

#[tokio::test]
async fn delete_registration_removes_enrollment_and_progress() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let (user_id, topic_ids) =
        registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;

    let removed = repository
        .delete_registration(user_id, training_id, &topic_ids)
        .await
        .expect("delete registration");
    assert!(removed);

    let registrations = repository
        .registered_trainings(user_id)
        .await
        .expect("list registrations");
    assert!(registrations.is_empty());

    let topics = repository.topics(training_id).await.expect("load topics");
    let progress = repository
        .filtered_topic_users(&topics, user_id)
        .await
        .expect("load progress");
    assert!(progress.is_empty());

    let removed_again = repository
        .delete_registration(user_id, training_id, &topic_ids)
        .await
        .expect("delete registration again");
    assert!(!removed_again);
}

#[tokio::test]
async fn enrolled_users_are_partitioned_by_completion() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let (finisher, _) = registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;
    registered_user(&repository, &pool, "Bia", "bia@example.com", training_id).await;

    finish_enrollment(&repository, finisher, training_id).await;

    let users = repository
        .users_registered_in_training(training_id)
        .await
        .expect("partition users");

    assert_eq!(users.finished_users, vec!["Ana".to_string()]);
    assert_eq!(users.active_users, vec!["Bia".to_string()]);
    // Every enrollment lands in exactly one of the two buckets.
    assert_eq!(users.finished_users.len() + users.active_users.len(), 2);
}

#[tokio::test]
async fn reports_count_finished_students_per_training() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let busy = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    repository
        .create_training(sample_training("Go"))
        .await
        .expect("create training");

    let (finisher, _) = registered_user(&repository, &pool, "Ana", "ana@example.com", busy).await;
    registered_user(&repository, &pool, "Bia", "bia@example.com", busy).await;
    finish_enrollment(&repository, finisher, busy).await;

    let reports = repository.reports().await.expect("build reports");
    assert_eq!(reports.len(), 2);

    let rust = reports
        .iter()
        .find(|report| report.name == "Rust")
        .expect("rust report");
    assert_eq!(rust.total_finished_students, 1);

    let go = reports
        .iter()
        .find(|report| report.name == "Go")
        .expect("go report");
    assert_eq!(go.total_finished_students, 0);
}

#[tokio::test]
async fn unregistered_trainings_excludes_enrollments() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let enrolled = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let open = repository
        .create_training(sample_training("Go"))
        .await
        .expect("create training");

    let (user_id, _) = registered_user(&repository, &pool, "Ana", "ana@example.com", enrolled).await;

    let available = repository
        .unregistered_trainings(user_id)
        .await
        .expect("list available");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, open);
}

#[tokio::test]
async fn complete_topics_marks_progress_rows() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let (user_id, topic_ids) =
        registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;

    assert!(repository
        .complete_topics(user_id, &topic_ids)
        .await
        .expect("complete topics"));

    let topics = repository.topics(training_id).await.expect("load topics");
    let progress = repository
        .filtered_topic_users(&topics, user_id)
        .await
        .expect("load progress");
    assert!(progress.iter().all(|row| row.completed));

    // Rows for topics the user never registered for are not invented.
    assert!(!repository
        .complete_topics(user_id, &[Uuid::new_v4()])
        .await
        .expect("complete unknown topic"));
}

#[tokio::test]
async fn filtering_progress_against_no_topics_is_empty() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;

    let progress = repository
        .filtered_topic_users(&[], user_id)
        .await
        .expect("load progress");
    assert!(progress.is_empty());
}

#[tokio::test]
async fn topics_come_back_in_module_then_topic_order() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");

    let topics = repository.topics(training_id).await.expect("load topics");
    let names: Vec<&str> = topics.iter().map(|topic| topic.name.as_str()).collect();
    assert_eq!(names, vec!["Setup", "Syntax", "Modeling"]);
}

#[tokio::test]
async fn update_training_user_round_trips_the_completed_flag() {
    let pool = test_pool().await;
    let repository = SqliteTrainingRepository::new(pool.clone());

    let training_id = repository
        .create_training(sample_training("Rust"))
        .await
        .expect("create training");
    let (user_id, _) = registered_user(&repository, &pool, "Ana", "ana@example.com", training_id).await;

    finish_enrollment(&repository, user_id, training_id).await;

    let reloaded: TrainingUser = repository
        .training_user(user_id, training_id)
        .await
        .expect("load enrollment")
        .expect("enrollment exists");
    assert!(reloaded.completed);
}
