use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{NewUser, UpdateUser, User};

#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Inserts the user and returns the generated id; a duplicate email
    /// surfaces as `DatabaseError::Duplicate`.
    async fn add(&self, user: &NewUser) -> DbResult<Uuid>;

    /// Patches the given fields; false when no such user exists.
    async fn update(&self, id: Uuid, update: &UpdateUser) -> DbResult<bool>;

    async fn get_all(&self) -> DbResult<Vec<User>>;

    /// Case-insensitive email lookup.
    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>>;
}

#[derive(Clone)]
pub struct SqliteUsersRepository {
    pool: SqlitePool,
}

impl SqliteUsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for SqliteUsersRepository {
    async fn add(&self, user: &NewUser) -> DbResult<Uuid> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, age, email, cpf, password, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(user.age)
        .bind(user.email.to_lowercase())
        .bind(user.cpf)
        .bind(user.password.expose_secret())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: Uuid, update: &UpdateUser) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?1, name),
                age = COALESCE(?2, age),
                email = COALESCE(?3, email),
                cpf = COALESCE(?4, cpf),
                updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(update.name.as_deref())
        .bind(update.age)
        .bind(update.email.as_deref().map(str::to_lowercase))
        .bind(update.cpf)
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, age, email, cpf, password, created_at, updated_at FROM users",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, age, email, cpf, password, created_at, updated_at
            FROM users
            WHERE email = ?1 COLLATE NOCASE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
