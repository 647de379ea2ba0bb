use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user session as stored in the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The username this session is logged in as.
    pub username: String,
    /// The anti-forgery token embedded in this session's forms.
    pub csrf_token: String,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// The session resolved for the current request.
///
/// Inserted into the request extensions by the session middleware and
/// handed to handlers explicitly; an empty context means anonymous.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// The token held by the client, if it maps to a live session.
    pub id: Option<Uuid>,
    /// The session record behind `id`.
    pub session: Option<Session>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(id: Uuid, session: Session) -> Self {
        Self {
            id: Some(id),
            session: Some(session),
        }
    }

    /// The logged-in username, if any.
    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    /// The CSRF token for forms rendered in this session.
    pub fn csrf_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.csrf_token.as_str())
    }
}
