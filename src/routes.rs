use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    compression::CompressionLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Largest form body accepted, in bytes.
pub const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// Builds the application router with every layer attached.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let auth_routes = Router::new()
        .route("/", get(handlers::auth::home))
        .route(
            "/register",
            get(handlers::auth::register_form).post(handlers::auth::register),
        )
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route("/logout", post(handlers::auth::logout));

    let user_routes = Router::new()
        .route("/users/{username}", get(handlers::users::show_user))
        .route("/users/{username}/delete", post(handlers::users::delete_user))
        .route(
            "/users/{username}/notes/add",
            get(handlers::notes::add_note_form).post(handlers::notes::add_note),
        );

    let note_routes = Router::new()
        .route(
            "/notes/{note_id}/update",
            get(handlers::notes::update_note_form).post(handlers::notes::update_note),
        )
        .route("/notes/{note_id}/delete", post(handlers::notes::delete_note));

    Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(note_routes)
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::session::load_session,
        ))
        .with_state(state)
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
}
