//! SQLite-backed user store

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::models::{NewUser, UserRecord};

/// Persistence for user records and their current refresh credential
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn count_by_email(&self, email: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_phone(&self, phone: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE phone = ?")
            .bind(phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn insert(&self, user: &NewUser, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        let now = timestamp(at);
        sqlx::query(
            "INSERT INTO users (id, user_id, first_name, last_name, email, phone, password_hash, user_type, refresh_token, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.user_id)
        .bind(&user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.user_type.as_str())
        .bind(&user.refresh_token)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user.user_id, "Inserted user record");
        Ok(())
    }

    /// Overwrite the stored refresh credential; returns the number of rows touched
    pub async fn update_refresh_token(
        &self,
        user_id: &str,
        refresh_token: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET refresh_token = ?, updated_at = ? WHERE user_id = ?")
                .bind(refresh_token)
                .bind(timestamp(at))
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Replace the stored refresh credential only if it still equals `current`
    ///
    /// Returns 0 when another rotation or login already replaced it.
    pub async fn rotate_refresh_token(
        &self,
        user_id: &str,
        current: &str,
        replacement: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = ?, updated_at = ? WHERE user_id = ? AND refresh_token = ?",
        )
        .bind(replacement)
        .bind(timestamp(at))
        .bind(user_id)
        .bind(current)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY created_at, user_id")
            .fetch_all(&self.pool)
            .await
    }
}
