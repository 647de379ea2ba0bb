use crate::{
    crypto::csrf::tokens_match,
    error::{AppError, Result},
    models::session::SessionContext,
};

/// What the request wants to do with the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Rendering a page (GET).
    View,
    /// Changing state (POST).
    Mutate,
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Send the client to the login page with a flash message.
    DenyRedirect,
    /// Fail the request with 401.
    DenyUnauthorized,
}

/// Decides whether `session_username` may act on a resource owned by
/// `resource_owner`.
///
/// Only the owner is allowed. Denied views redirect; denied mutations fail
/// hard so a forged POST never looks like it went through.
pub fn authorize(session_username: Option<&str>, resource_owner: &str, intent: Intent) -> Decision {
    match session_username {
        Some(username) if username == resource_owner => Decision::Allow,
        _ => match intent {
            Intent::View => Decision::DenyRedirect,
            Intent::Mutate => Decision::DenyUnauthorized,
        },
    }
}

impl Decision {
    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::DenyRedirect => Err(AppError::LoginRequired),
            Decision::DenyUnauthorized => Err(AppError::Unauthorized),
        }
    }
}

/// The error a denied request of this intent produces.
pub fn denial(intent: Intent) -> AppError {
    match intent {
        Intent::View => AppError::LoginRequired,
        Intent::Mutate => AppError::Unauthorized,
    }
}

/// Requires the current session to belong to `resource_owner`.
pub fn require_owner(ctx: &SessionContext, resource_owner: &str, intent: Intent) -> Result<()> {
    let decision = authorize(ctx.username(), resource_owner, intent);
    if decision != Decision::Allow {
        tracing::warn!(
            "🚫 {:?} on resource of {} denied for {:?}",
            intent,
            resource_owner,
            ctx.username()
        );
    }

    match decision {
        Decision::DenyRedirect if ctx.username().is_some() => Err(AppError::AccessDenied),
        decision => decision.into_result(),
    }
}

/// Requires `submitted` to equal the session's CSRF token.
///
/// Anonymous requests have no token and always fail.
pub fn require_csrf(ctx: &SessionContext, submitted: &str) -> Result<()> {
    match ctx.csrf_token() {
        Some(expected) if tokens_match(expected, submitted) => Ok(()),
        _ => {
            tracing::warn!("❌ CSRF: token missing or mismatched for {:?}", ctx.username());
            Err(AppError::CsrfMismatch)
        }
    }
}
