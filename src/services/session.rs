use chrono::Utc;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{
    config::Config,
    crypto::csrf::generate_csrf_token,
    error::Result,
    models::session::{Session, SessionContext},
    state::AppState,
};

/// The name of the signed cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Creates the session cookie.
fn create_secure_cookie(config: &Config, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);

    cookie.set_http_only(true);

    if config.secure_cookies {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(config.session_ttl_secs() as i64));
    cookie.set_path("/");

    cookie
}

/// Reads the session bound to the client, if any.
///
/// The cookie signature is checked before the store is consulted; a
/// tampered, unknown or expired token resolves to an anonymous context.
pub async fn resolve(state: &AppState, cookies: &Cookies) -> Result<SessionContext> {
    let session_id = cookies
        .signed(&state.cookie_key)
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let Some(session_id) = session_id else {
        return Ok(SessionContext::anonymous());
    };

    match state.sessions.load(session_id).await? {
        Some(session) if session.is_expired() => {
            tracing::warn!("❌ Session expired for user: {}", session.username);
            state.sessions.remove(session_id).await?;
            Ok(SessionContext::anonymous())
        }
        Some(session) => {
            tracing::debug!("✅ Session resolved for user: {}", session.username);
            Ok(SessionContext::new(session_id, session))
        }
        None => {
            tracing::debug!("🔑 Unknown session_id: {}", session_id);
            Ok(SessionContext::anonymous())
        }
    }
}

/// Binds the client to `username`.
///
/// Any session the client already held is destroyed first, and the new
/// session gets a fresh token and a fresh CSRF token.
pub async fn start(
    state: &AppState,
    cookies: &Cookies,
    current: &SessionContext,
    username: &str,
) -> Result<SessionContext> {
    if let Some(old_id) = current.id {
        state.sessions.remove(old_id).await?;
    }

    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let session = Session {
        username: username.to_string(),
        csrf_token: generate_csrf_token()?,
        created_at: now,
        expires_at: now + chrono::Duration::days(state.config.session_duration_days),
    };

    state
        .sessions
        .save(session_id, &session, state.config.session_ttl_secs())
        .await?;

    cookies
        .signed(&state.cookie_key)
        .add(create_secure_cookie(&state.config, session_id.to_string()));

    tracing::info!("✅ Session started for user: {}", username);
    Ok(SessionContext::new(session_id, session))
}

/// Destroys the client's session and clears its cookie.
pub async fn end(state: &AppState, cookies: &Cookies, current: &SessionContext) -> Result<()> {
    if let Some(session_id) = current.id {
        state.sessions.remove(session_id).await?;
    }

    let mut session_cookie = Cookie::new(SESSION_COOKIE, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    if let Some(username) = current.username() {
        tracing::info!("👋 Session ended for user: {}", username);
    }
    Ok(())
}

/// Destroys every session bound to `username`, wherever it was opened.
pub async fn end_all_for(state: &AppState, username: &str) -> Result<()> {
    state.sessions.remove_all_for(username).await
}
