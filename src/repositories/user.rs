use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::{
    error::{AppError, Result},
    models::user::{NewUser, User},
    repositories::UserRepository,
};

/// `UserRepository` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(
                r#"
                INSERT INTO users (username, password_hash, email, first_name, last_name)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (username) DO NOTHING
                RETURNING username, password_hash, email, first_name, last_name, created_at
                "#,
            )
            .await?;

        let row = client
            .query_opt(
                &statement,
                &[
                    &user.username,
                    &user.password_hash,
                    &user.email,
                    &user.first_name,
                    &user.last_name,
                ],
            )
            .await?
            .ok_or(AppError::DuplicateUser)?;

        User::try_from(&row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(
                r#"
                SELECT username, password_hash, email, first_name, last_name, created_at
                FROM users
                WHERE username = $1
                "#,
            )
            .await?;

        let row = client.query_opt(&statement, &[&username]).await?;
        row.map(|r| User::try_from(&r)).transpose()
    }

    async fn delete_with_notes(&self, username: &str) -> Result<bool> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        // Notes go explicitly even though the FK cascades, so the whole
        // removal is visible in one transaction.
        let notes_deleted = tx
            .execute("DELETE FROM notes WHERE owner = $1", &[&username])
            .await?;
        let users_deleted = tx
            .execute("DELETE FROM users WHERE username = $1", &[&username])
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🗑️ Deleted user {} ({} rows) with {} notes",
            username,
            users_deleted,
            notes_deleted
        );
        Ok(users_deleted > 0)
    }
}
