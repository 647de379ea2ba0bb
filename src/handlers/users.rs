use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use tower_cookies::Cookies;

use crate::{
    error::Result,
    handlers::auth::CsrfForm,
    models::session::SessionContext,
    services::{
        flash::{self, Flash},
        guard::{self, Intent},
        session as session_service,
        users as user_service,
    },
    state::AppState,
    views,
};

/// Shows a user's details and notes to that user.
#[axum::debug_handler]
pub async fn show_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> Result<Response> {
    guard::require_owner(&ctx, &username, Intent::View)?;

    let (user, notes) = user_service::profile(&state, &username).await?;
    let flash = flash::take(&cookies);

    Ok(views::user_page(&ctx, &user, &notes, flash).into_response())
}

/// Deletes the logged-in user's account and notes, then logs them out.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
    Path(username): Path<String>,
    Form(form): Form<CsrfForm>,
) -> Result<Response> {
    guard::require_owner(&ctx, &username, Intent::Mutate)?;
    guard::require_csrf(&ctx, &form.csrf_token)?;

    user_service::delete_account(&state, &username).await?;
    session_service::end(&state, &cookies, &ctx).await?;
    flash::set(&cookies, Flash::AccountDeleted);

    Ok(Redirect::to("/").into_response())
}
