use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        note::Note,
        session::Session,
        user::{NewUser, User},
    },
    repositories::{NoteRepository, SessionStore, UserRepository},
};

#[derive(Clone, Default)]
struct Tables {
    users: HashMap<String, User>,
    notes: HashMap<Uuid, Note>,
}

/// In-process user and note storage for development and tests.
///
/// Both tables sit behind one lock, so the user/notes foreign key holds
/// and user deletion is a single swap of the staged tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    #[cfg(test)]
    fail_mid_cascade: Arc<std::sync::atomic::AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.username) {
            return Err(AppError::DuplicateUser);
        }

        let stored = User {
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: Utc::now(),
        };
        tables.users.insert(stored.username.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }

    async fn delete_with_notes(&self, username: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();

        staged.notes.retain(|_, note| note.owner != username);

        #[cfg(test)]
        {
            if self.fail_mid_cascade.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(AppError::Internal("injected failure during cascade".to_string()));
            }
        }

        let existed = staged.users.remove(username).is_some();
        *tables = staged;
        Ok(existed)
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn create(&self, id: Uuid, title: &str, content: &str, owner: &str) -> Result<Note> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(owner) {
            return Err(AppError::NotFound);
        }

        let now = Utc::now();
        let note = Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            owner: owner.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.notes.insert(id, note.clone());
        Ok(note)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        Ok(self.tables.read().await.notes.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, title: &str, content: &str) -> Result<Note> {
        let mut tables = self.tables.write().await;
        let note = tables.notes.get_mut(&id).ok_or(AppError::NotFound)?;
        note.title = title.to_string();
        note.content = content.to_string();
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.tables
            .write()
            .await
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Note>> {
        let tables = self.tables.read().await;
        let mut notes: Vec<Note> = tables
            .notes
            .values()
            .filter(|note| note.owner == owner)
            .cloned()
            .collect();
        notes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }
}

/// In-process `SessionStore` with TTL handling.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, (Session, chrono::DateTime<Utc>)>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, id: Uuid, session: &Session, ttl_secs: u64) -> Result<()> {
        let evict_at = Utc::now() + Duration::seconds(ttl_secs as i64);
        self.sessions
            .lock()
            .await
            .insert(id, (session.clone(), evict_at));
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<Session>> {
        let mut sessions = self.sessions.lock().await;
        let Some((session, evict_at)) = sessions.get(&id).cloned() else {
            return Ok(None);
        };

        if Utc::now() >= evict_at {
            sessions.remove(&id);
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions.lock().await.remove(&id);
        Ok(())
    }

    async fn remove_all_for(&self, username: &str) -> Result<()> {
        self.sessions
            .lock()
            .await
            .retain(|_, (session, _)| session.username != username);
        Ok(())
    }
}
