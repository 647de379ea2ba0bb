use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::note::Note,
    repositories::NoteRepository,
};

const NOTE_COLUMNS: &str = "id, title, content, owner, created_at, updated_at";

/// `NoteRepository` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool,
}

impl PgNoteRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, id: Uuid, title: &str, content: &str, owner: &str) -> Result<Note> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(&format!(
                "INSERT INTO notes (id, title, content, owner) VALUES ($1, $2, $3, $4) RETURNING {}",
                NOTE_COLUMNS
            ))
            .await?;

        let row = client
            .query_one(&statement, &[&id, &title, &content, &owner])
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
                    AppError::NotFound
                } else {
                    AppError::Database(e)
                }
            })?;

        Note::try_from(&row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(&format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS))
            .await?;

        let row = client.query_opt(&statement, &[&id]).await?;
        row.map(|r| Note::try_from(&r)).transpose()
    }

    async fn update(&self, id: Uuid, title: &str, content: &str) -> Result<Note> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(&format!(
                r#"
                UPDATE notes
                SET title = $2, content = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING {}
                "#,
                NOTE_COLUMNS
            ))
            .await?;

        let row = client
            .query_opt(&statement, &[&id, &title, &content])
            .await?
            .ok_or(AppError::NotFound)?;

        Note::try_from(&row)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Note>> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(&format!(
                "SELECT {} FROM notes WHERE owner = $1 ORDER BY created_at ASC, id ASC",
                NOTE_COLUMNS
            ))
            .await?;

        client
            .query(&statement, &[&owner])
            .await?
            .iter()
            .map(Note::try_from)
            .collect()
    }
}
