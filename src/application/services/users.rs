//! # User Service
//!
//! Upsert-on-contact user management and role checks.

use sqlx::PgConnection;

use crate::domain::models::{User, UserRole};

pub struct UserService<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> UserService<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert the user on first contact, otherwise refresh the mutable
    /// profile fields. Absent (None) profile fields never overwrite stored
    /// values; `last_active` is bumped on every call.
    pub async fn get_or_create(
        &mut self,
        matrix_id: &str,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        language_code: &str,
    ) -> sqlx::Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (matrix_id, username, first_name, last_name, language_code, last_active)
             VALUES ($1, $2, $3, $4, $5, now())
             ON CONFLICT (matrix_id) DO UPDATE SET
                 username    = COALESCE(EXCLUDED.username, users.username),
                 first_name  = COALESCE(EXCLUDED.first_name, users.first_name),
                 last_name   = COALESCE(EXCLUDED.last_name, users.last_name),
                 last_active = now()
             RETURNING *",
        )
        .bind(matrix_id)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(language_code)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!("Resolved user {matrix_id}");
        Ok(user)
    }

    /// Grant or revoke the admin role. Returns false when the user is unknown.
    pub async fn set_admin(&mut self, matrix_id: &str, is_admin: bool) -> sqlx::Result<bool> {
        let role = if is_admin {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let result = sqlx::query("UPDATE users SET role = $2 WHERE matrix_id = $1")
            .bind(matrix_id)
            .bind(role)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("User {matrix_id} role set to {role:?}");
        }
        Ok(result.rows_affected() > 0)
    }
}
