use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use tower_cookies::Cookies;

use crate::{
    error::Result,
    handlers::auth::{CsrfForm, user_url},
    models::session::SessionContext,
    services::{
        flash::{self, Flash},
        guard::{self, Intent},
        notes as note_service,
    },
    state::AppState,
    validation::{
        errors::FieldErrors,
        notes::{NoteForm, validate_note},
    },
    views,
};

fn add_note_url(username: &str) -> String {
    format!("/users/{}/notes/add", username)
}

fn update_note_url(note_id: &uuid::Uuid) -> String {
    format!("/notes/{}/update", note_id)
}

/// Shows the add-note form.
#[axum::debug_handler]
pub async fn add_note_form(
    Extension(ctx): Extension<SessionContext>,
    Path(username): Path<String>,
) -> Result<Response> {
    guard::require_owner(&ctx, &username, Intent::View)?;

    Ok(views::note_form_page(
        &ctx,
        "Add Note",
        &add_note_url(&username),
        "",
        "",
        &FieldErrors::new(),
    )
    .into_response())
}

/// Creates a note for the logged-in user.
#[axum::debug_handler]
pub async fn add_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(username): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response> {
    guard::require_owner(&ctx, &username, Intent::Mutate)?;
    guard::require_csrf(&ctx, &form.csrf_token)?;

    let input = match validate_note(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(views::note_form_page(
                &ctx,
                "Add Note",
                &add_note_url(&username),
                &form.title,
                &form.content,
                &errors,
            )
            .into_response());
        }
    };

    note_service::create_note(&state, &username, input).await?;
    Ok(Redirect::to(&user_url(&username)).into_response())
}

/// Shows the update form pre-filled with the stored note.
#[axum::debug_handler]
pub async fn update_note_form(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(note_id): Path<String>,
) -> Result<Response> {
    let note = note_service::load_authorized(&state, &ctx, &note_id, Intent::View).await?;

    Ok(views::note_form_page(
        &ctx,
        "Edit Note",
        &update_note_url(&note.id),
        &note.title,
        &note.content,
        &FieldErrors::new(),
    )
    .into_response())
}

/// Updates a note owned by the logged-in user.
#[axum::debug_handler]
pub async fn update_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(note_id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response> {
    let note = note_service::load_authorized(&state, &ctx, &note_id, Intent::Mutate).await?;
    guard::require_csrf(&ctx, &form.csrf_token)?;

    let input = match validate_note(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(views::note_form_page(
                &ctx,
                "Edit Note",
                &update_note_url(&note.id),
                &form.title,
                &form.content,
                &errors,
            )
            .into_response());
        }
    };

    let updated = note_service::update_note(&state, &note, input).await?;
    Ok(Redirect::to(&user_url(&updated.owner)).into_response())
}

/// Deletes a note owned by the logged-in user.
#[axum::debug_handler]
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    cookies: Cookies,
    Path(note_id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> Result<Response> {
    let note = note_service::load_authorized(&state, &ctx, &note_id, Intent::Mutate).await?;
    guard::require_csrf(&ctx, &form.csrf_token)?;

    note_service::delete_note(&state, &note).await?;
    flash::set(&cookies, Flash::NoteDeleted);

    Ok(Redirect::to(&user_url(&note.owner)).into_response())
}
