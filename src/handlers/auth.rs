use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use zeroize::Zeroize;

use crate::{
    error::{AppError, Result},
    models::session::SessionContext,
    services::{
        auth as auth_service,
        flash::{self, Flash},
        guard,
        session as session_service,
    },
    state::AppState,
    validation::{auth::*, errors::FieldErrors},
    views,
};

/// Forms that carry nothing but the anti-forgery token.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct CsrfForm {
    pub csrf_token: String,
}

/// The canonical page of a user.
pub fn user_url(username: &str) -> String {
    format!("/users/{}", username)
}

fn render_register(ctx: &SessionContext, form: &RegisterForm, errors: &FieldErrors) -> Response {
    views::register_page(
        ctx,
        &form.username,
        &form.email,
        &form.first_name,
        &form.last_name,
        errors,
        None,
    )
    .into_response()
}

/// Sends visitors to the registration page.
pub async fn home() -> Redirect {
    Redirect::to("/register")
}

/// Shows the registration form.
#[axum::debug_handler]
pub async fn register_form(
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
) -> Response {
    let flash = flash::take(&cookies);
    views::register_page(&ctx, "", "", "", "", &FieldErrors::new(), flash).into_response()
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
    Form(mut form): Form<RegisterForm>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt for: {}", form.username);

    let validated = validate_registration(&form);
    form.zeroize();

    let registration = match validated {
        Ok(registration) => registration,
        Err(errors) => {
            tracing::debug!("Registration form rejected: {:?}", errors);
            return Ok(render_register(&ctx, &form, &errors));
        }
    };

    let user = match auth_service::register(state.users.as_ref(), registration).await {
        Ok(user) => user,
        Err(AppError::DuplicateUser) => {
            tracing::info!("Username already taken: {}", form.username);
            let errors = FieldErrors::single("username", "Username is already taken");
            return Ok(render_register(&ctx, &form, &errors));
        }
        Err(e) => return Err(e),
    };

    session_service::start(&state, &cookies, &ctx, &user.username).await?;
    tracing::info!("✅ User registered: {}", user.username);

    Ok(Redirect::to(&user_url(&user.username)).into_response())
}

/// Shows the login form, or the user's page when already logged in.
#[axum::debug_handler]
pub async fn login_form(
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
) -> Response {
    if let Some(username) = ctx.username() {
        return Redirect::to(&user_url(username)).into_response();
    }

    let flash = flash::take(&cookies);
    views::login_page(&ctx, "", &FieldErrors::new(), flash).into_response()
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
    Form(mut form): Form<LoginForm>,
) -> Result<Response> {
    if let Some(username) = ctx.username() {
        return Ok(Redirect::to(&user_url(username)).into_response());
    }

    tracing::info!("🔐 Login attempt for: {}", form.username);

    let validated = validate_login(&form);
    form.zeroize();

    let credentials = match validated {
        Ok(credentials) => credentials,
        Err(errors) => {
            return Ok(views::login_page(&ctx, &form.username, &errors, None).into_response());
        }
    };

    match auth_service::authenticate(state.users.as_ref(), credentials).await? {
        Some(user) => {
            session_service::start(&state, &cookies, &ctx, &user.username).await?;
            tracing::info!("✅ User logged in: {}", user.username);
            Ok(Redirect::to(&user_url(&user.username)).into_response())
        }
        None => {
            let errors = FieldErrors::single("username", "Bad username/password");
            Ok(views::login_page(&ctx, &form.username, &errors, None).into_response())
        }
    }
}

/// Handles user logout.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
    Form(form): Form<CsrfForm>,
) -> Result<Response> {
    if ctx.username().is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    guard::require_csrf(&ctx, &form.csrf_token)?;
    session_service::end(&state, &cookies, &ctx).await?;
    flash::set(&cookies, Flash::LoggedOut);

    Ok(Redirect::to("/").into_response())
}
