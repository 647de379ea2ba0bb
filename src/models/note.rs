use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Represents a note in the system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    /// The unique identifier for the note.
    pub id: Uuid,
    /// The note's title.
    pub title: String,
    /// The note's body.
    pub content: String,
    /// The username of the user who owns the note.
    pub owner: String,
    /// The timestamp when the note was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the note was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Note {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Note {
            id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
            title: row.try_get("title").map_err(|_| AppError::MissingData("title".to_string()))?,
            content: row.try_get("content").map_err(|_| AppError::MissingData("content".to_string()))?,
            owner: row.try_get("owner").map_err(|_| AppError::MissingData("owner".to_string()))?,
            created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
            updated_at: row.try_get("updated_at").map_err(|_| AppError::MissingData("updated_at".to_string()))?,
        })
    }
}
