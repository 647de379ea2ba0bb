use crate::{
    error::{AppError, Result},
    models::{note::Note, user::User},
    services::{notes as note_service, session as session_service},
    state::AppState,
};

/// Loads a user with the notes they own.
pub async fn profile(state: &AppState, username: &str) -> Result<(User, Vec<Note>)> {
    let user = state
        .users
        .find_by_username(username)
        .await?
        .ok_or(AppError::NotFound)?;
    let notes = note_service::list_notes(state, username).await?;
    Ok((user, notes))
}

/// Deletes a user and everything they own.
///
/// Sessions bound to the username are dropped before the user row goes, so
/// a failing session store leaves the account intact instead of leaving
/// live sessions for a name that can be registered again. A second sweep
/// after the delete catches logins that landed in between.
pub async fn delete_account(state: &AppState, username: &str) -> Result<()> {
    session_service::end_all_for(state, username).await?;

    if !state.users.delete_with_notes(username).await? {
        return Err(AppError::NotFound);
    }

    if let Err(e) = session_service::end_all_for(state, username).await {
        tracing::error!("❌ Post-delete session sweep failed for {}: {}", username, e);
    }

    tracing::info!("✅ Account deleted: {}", username);
    Ok(())
}
