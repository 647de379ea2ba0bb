use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{note::Note, session::SessionContext},
    services::guard::{self, Intent},
    state::AppState,
    validation::notes::NoteInput,
};

/// Fetches a note the current session is allowed to act on.
///
/// Anonymous clients are denied before the id is even parsed. An id that
/// is not a UUID names no note. Ownership is checked against the stored
/// note, never against anything the client sent.
pub async fn load_authorized(
    state: &AppState,
    ctx: &SessionContext,
    raw_id: &str,
    intent: Intent,
) -> Result<Note> {
    if ctx.username().is_none() {
        return Err(guard::denial(intent));
    }

    let note_id = Uuid::parse_str(raw_id).map_err(|_| AppError::NotFound)?;
    let note = state.notes.get(note_id).await?.ok_or(AppError::NotFound)?;
    guard::require_owner(ctx, &note.owner, intent)?;
    Ok(note)
}

/// Creates a note owned by `owner`.
pub async fn create_note(state: &AppState, owner: &str, input: NoteInput) -> Result<Note> {
    let note_id = Uuid::new_v4();
    let note = state
        .notes
        .create(note_id, &input.title, &input.content, owner)
        .await?;

    tracing::info!("📝 Note {} created for {}", note.id, owner);
    Ok(note)
}

/// Replaces the title and content of an already authorized note.
pub async fn update_note(state: &AppState, note: &Note, input: NoteInput) -> Result<Note> {
    let updated = state
        .notes
        .update(note.id, &input.title, &input.content)
        .await?;

    tracing::info!("📝 Note {} updated by {}", note.id, note.owner);
    Ok(updated)
}

/// Deletes an already authorized note.
pub async fn delete_note(state: &AppState, note: &Note) -> Result<()> {
    state.notes.delete(note.id).await?;
    tracing::info!("🗑️ Note {} deleted by {}", note.id, note.owner);
    Ok(())
}

/// Lists the notes owned by `owner`.
pub async fn list_notes(state: &AppState, owner: &str) -> Result<Vec<Note>> {
    state.notes.list_by_owner(owner).await
}
