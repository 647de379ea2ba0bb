use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{services::session as session_service, state::AppState};

/// A middleware that resolves the client's session for every request.
///
/// Inserts a `SessionContext` into the request extensions; it is empty for
/// anonymous clients. Handlers take it explicitly and decide what a
/// missing session means for them.
pub async fn load_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Resolving session...");

    let ctx = match session_service::resolve(&state, &cookies).await {
        Ok(ctx) => ctx,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(ctx);
    next.run(request).await
}
