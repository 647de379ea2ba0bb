use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    note::Note,
    session::Session,
    user::{NewUser, User},
};

/// Persistent storage for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `DuplicateUser` and leaves the existing
    /// record untouched when the username is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Deletes a user together with every note it owns, atomically.
    /// Returns `false` when no such user existed.
    async fn delete_with_notes(&self, username: &str) -> Result<bool>;
}

/// Persistent storage for notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Stores a new note. Fails with `NotFound` when the owner does not exist.
    async fn create(&self, id: Uuid, title: &str, content: &str, owner: &str) -> Result<Note>;

    /// Fetches a note by id.
    async fn get(&self, id: Uuid) -> Result<Option<Note>>;

    /// Replaces a note's title and content.
    async fn update(&self, id: Uuid, title: &str, content: &str) -> Result<Note>;

    /// Deletes a note. Fails with `NotFound` when it does not exist.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Lists the notes owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Note>>;
}

/// Process-external session storage, keyed by the opaque session token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `session` under `id` for `ttl_secs` seconds.
    async fn save(&self, id: Uuid, session: &Session, ttl_secs: u64) -> Result<()>;

    /// Loads the session stored under `id`.
    async fn load(&self, id: Uuid) -> Result<Option<Session>>;

    /// Removes the session stored under `id`, if any.
    async fn remove(&self, id: Uuid) -> Result<()>;

    /// Removes every session bound to `username`.
    async fn remove_all_for(&self, username: &str) -> Result<()>;
}
