use std::sync::Arc;
use tower_cookies::Key;
use crate::config::{Backend, Config, SESSION_SECRET_MIN_BYTES};
use crate::error::{AppError, Result};
use crate::repositories::{
    NoteRepository, SessionStore, UserRepository,
    memory::{MemorySessionStore, MemoryStore},
    note::PgNoteRepository,
    session::RedisSessionStore,
    user::PgUserRepository,
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// User records.
    pub users: Arc<dyn UserRepository>,
    /// Notes.
    pub notes: Arc<dyn NoteRepository>,
    /// Server-side session records.
    pub sessions: Arc<dyn SessionStore>,
    /// The application's configuration.
    pub config: Config,
    /// The key that signs session cookies.
    pub cookie_key: Key,
}

impl AppState {
    /// Creates a new `AppState` for the configured backend.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        match config.backend {
            Backend::Postgres => Self::connect(config).await,
            Backend::Memory => Self::in_memory(config.clone()),
        }
    }

    /// Connects to PostgreSQL and Redis and applies the schema.
    async fn connect(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        crate::db::run_migrations(&db).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = redis::aio::ConnectionManager::new(redis_client).await?;
        tracing::info!("✅ Redis Connection Manager initialized");

        Ok(AppState {
            users: Arc::new(PgUserRepository::new(db.clone())),
            notes: Arc::new(PgNoteRepository::new(db)),
            sessions: Arc::new(RedisSessionStore::new(redis)),
            cookie_key: cookie_key(config)?,
            config: config.clone(),
        })
    }

    /// Builds a state that keeps everything in process memory.
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = MemoryStore::new();
        tracing::warn!("⚠️  Using the in-memory backend; data is lost on restart");

        Ok(AppState {
            users: Arc::new(store.clone()),
            notes: Arc::new(store),
            sessions: Arc::new(MemorySessionStore::new()),
            cookie_key: cookie_key(&config)?,
            config,
        })
    }
}

fn cookie_key(config: &Config) -> Result<Key> {
    if config.session_secret.len() < SESSION_SECRET_MIN_BYTES {
        return Err(AppError::Internal(format!(
            "session secret must be at least {} bytes",
            SESSION_SECRET_MIN_BYTES
        )));
    }
    Ok(Key::from(config.session_secret.as_slice()))
}
