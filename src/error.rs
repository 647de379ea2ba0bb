use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::services::flash::{self, Flash};
use crate::views;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A pool construction error.
    #[error("Pool creation error: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A column that could not be read from a row.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The username is already registered.
    #[error("Username already exists")]
    DuplicateUser,

    /// The client has no session for a page that needs one.
    #[error("Login required")]
    LoginRequired,

    /// A logged-in session asked for a page it does not own.
    #[error("Access denied")]
    AccessDenied,

    /// The session does not own the resource it tried to change.
    #[error("Authorization failed")]
    Unauthorized,

    /// The submitted CSRF token is missing or does not match the session.
    #[error("CSRF token mismatch")]
    CsrfMismatch,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A session record that could not be read or written.
    #[error("Session error: {0}")]
    Session(String),

    /// A password hashing error.
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

fn redirect_to_login(message: Flash) -> Response {
    let mut response = Redirect::to("/login").into_response();
    if let Ok(value) = flash::set_cookie_header(message).parse() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }

            AppError::CreatePool(ref e) => {
                tracing::error!("Pool creation error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }

            AppError::Redis(ref e) => {
                tracing::error!("Redis error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session store error")
            }

            AppError::MissingData(ref column) => {
                tracing::error!("Missing column in row: {}", column);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }

            AppError::DuplicateUser => {
                tracing::debug!("Duplicate username");
                (StatusCode::CONFLICT, "Username is already taken")
            }

            AppError::LoginRequired => {
                tracing::warn!("Anonymous client denied, redirecting to login");
                return redirect_to_login(Flash::LoginRequired);
            }

            AppError::AccessDenied => {
                tracing::warn!("Foreign session denied, redirecting to login");
                return redirect_to_login(Flash::AccessDenied);
            }

            AppError::Unauthorized => {
                tracing::warn!("Authorization failed");
                (StatusCode::UNAUTHORIZED, "You are not allowed to do that.")
            }

            AppError::CsrfMismatch => {
                tracing::warn!("CSRF token mismatch");
                (StatusCode::FORBIDDEN, "The form has expired or is invalid. Please reload and try again.")
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found")
            }

            AppError::Session(ref msg) => {
                tracing::error!("Session error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session store error")
            }

            AppError::Hashing(ref msg) => {
                tracing::error!("Password hashing error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, views::error_page(status, message)).into_response()
    }
}
