use chrono::{DateTime, Utc};
use tokio_postgres::Row;

use crate::error::{AppError, Result};

/// Represents a user in the system.
#[derive(Clone, Debug)]
pub struct User {
    /// The user's username. Primary key.
    pub username: String,
    /// The Argon2id PHC string of the user's password.
    pub password_hash: String,
    /// The user's email address.
    pub email: String,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// A user that has not been stored yet.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<&Row> for User {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(User {
            username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
            password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
            email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
            first_name: row.try_get("first_name").map_err(|_| AppError::MissingData("first_name".to_string()))?,
            last_name: row.try_get("last_name").map_err(|_| AppError::MissingData("last_name".to_string()))?,
            created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        })
    }
}
