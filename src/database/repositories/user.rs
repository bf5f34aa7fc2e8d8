use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{is_unique_violation, placeholders};
use crate::database::models::{SignupFields, User, UserSummary, UserWrite};

const USER_COLUMNS: &str =
    "id, username, email, hashed_password, first_name, last_name, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the user. A concurrent signup that claimed the same email or
    /// username first comes back as `UserWrite::Taken`.
    pub async fn create_user(
        &self,
        fields: &SignupFields,
        hashed_password: &str,
    ) -> Result<UserWrite> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, hashed_password, first_name, last_name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&fields.username)
        .bind(&fields.email)
        .bind(hashed_password)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(UserWrite::Created(user)),
            Err(err) if is_unique_violation(&err) => Ok(UserWrite::Taken(taken_column(&err))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks a user up by username or email, whichever matches.
    pub async fn find_by_credential(&self, credential: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1 OR email = ?1 LIMIT 1"
        ))
        .bind(credential)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn find_summary(&self, id: i64) -> Result<Option<UserSummary>> {
        let summary = sqlx::query_as::<_, UserSummary>(
            "SELECT id, first_name, last_name FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn find_summaries(&self, ids: &[i64]) -> Result<HashMap<i64, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT id, first_name, last_name FROM users WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, UserSummary>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let summaries = query.fetch_all(&self.pool).await?;

        Ok(summaries.into_iter().map(|s| (s.id, s)).collect())
    }
}

/// SQLite reports `UNIQUE constraint failed: users.username` (or `users.email`).
fn taken_column(error: &sqlx::Error) -> &'static str {
    match error {
        sqlx::Error::Database(db) if db.message().contains("users.username") => "username",
        _ => "email",
    }
}
