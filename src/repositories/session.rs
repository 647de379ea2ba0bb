use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    repositories::SessionStore,
};

fn session_key(id: Uuid) -> String {
    format!("session:{}", id)
}

fn user_index_key(username: &str) -> String {
    format!("user_sessions:{}", username)
}

/// `SessionStore` backed by Redis.
///
/// Each session lives at `session:{id}` as JSON with a TTL. A set at
/// `user_sessions:{username}` indexes the ids bound to a user so they can
/// all be dropped when the user is deleted.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, id: Uuid, session: &Session, ttl_secs: u64) -> Result<()> {
        let session_json = sonic_rs::to_string(session)
            .map_err(|e| AppError::Session(format!("Session serialization failed: {}", e)))?;

        let index = user_index_key(&session.username);
        let mut conn = self.redis.clone();
        let _: () = redis::pipe()
            .atomic()
            .set_ex(session_key(id), &session_json, ttl_secs)
            .ignore()
            .sadd(&index, id.to_string())
            .ignore()
            .expire(&index, ttl_secs as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis session write failed: {}", e);
                AppError::Redis(e)
            })?;

        tracing::debug!("✅ Session saved to Redis: session:{}", id);
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<Session>> {
        let mut conn = self.redis.clone();
        let session_json: Option<String> = conn.get(session_key(id)).await?;

        match session_json {
            Some(json) => {
                let session = sonic_rs::from_str(&json)
                    .map_err(|e| AppError::Session(format!("Invalid session JSON: {}", e)))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<()> {
        let Some(session) = self.load(id).await? else {
            return Ok(());
        };

        let mut conn = self.redis.clone();
        let _: () = redis::pipe()
            .atomic()
            .del(session_key(id))
            .ignore()
            .srem(user_index_key(&session.username), id.to_string())
            .ignore()
            .query_async(&mut conn)
            .await?;

        tracing::debug!("✅ Session deleted from Redis: session:{}", id);
        Ok(())
    }

    async fn remove_all_for(&self, username: &str) -> Result<()> {
        let index = user_index_key(username);
        let mut conn = self.redis.clone();
        let ids: Vec<String> = conn.smembers(&index).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for id in &ids {
            pipe.del(format!("session:{}", id)).ignore();
        }
        pipe.del(&index).ignore();
        let _: () = pipe.query_async(&mut conn).await?;

        tracing::info!("✅ Removed {} sessions for user {}", ids.len(), username);
        Ok(())
    }
}
