#![allow(dead_code)]

use std::str::FromStr;

use secrecy::SecretBox;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use courses_backend::db::MIGRATOR;
use courses_backend::db::models::{ModuleDraft, NewUser, TopicDraft, TrainingDraft};
use courses_backend::db::repositories::{SqliteUsersRepository, UsersRepository};

/// Fresh in-memory database with the schema applied. The pool is pinned to a
/// single connection because every connection to `sqlite::memory:` opens its
/// own store.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect to in-memory sqlite");

    MIGRATOR.run(&pool).await.expect("run migrations");

    pool
}

/// Two modules, three topics, positions already assigned.
pub fn sample_training(name: &str) -> TrainingDraft {
    TrainingDraft {
        name: name.to_string(),
        summary: "Introductory track".to_string(),
        duration: 40,
        instructor: "Marta Reis".to_string(),
        author: Uuid::new_v4(),
        modules: vec![
            ModuleDraft {
                name: "Fundamentals".to_string(),
                position: 0,
                topics: vec![
                    TopicDraft {
                        name: "Setup".to_string(),
                        position: 0,
                    },
                    TopicDraft {
                        name: "Syntax".to_string(),
                        position: 1,
                    },
                ],
            },
            ModuleDraft {
                name: "Advanced".to_string(),
                position: 1,
                topics: vec![TopicDraft {
                    name: "Modeling".to_string(),
                    position: 0,
                }],
            },
        ],
    }
}

pub async fn seed_user(pool: &SqlitePool, name: &str, email: &str) -> Uuid {
    let repository = SqliteUsersRepository::new(pool.clone());

    repository
        .add(&NewUser {
            name: name.to_string(),
            age: 30,
            email: email.to_string(),
            cpf: 12345678900,
            password: SecretBox::new(Box::new("hunter2".to_string())),
        })
        .await
        .expect("insert user")
}
